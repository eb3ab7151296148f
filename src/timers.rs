use std::time::Duration;

use log::debug;

use crate::state::GameState;

/// State change applied when a timed power-up effect runs out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    /// Add the boost step back onto the tick interval. Not clamped.
    RestoreSpeed(Duration),
    /// Drop the invincible flag, whichever grant set it.
    EndInvincibility,
}

impl Expiry {
    pub fn apply(self, state: &mut GameState) {
        match self {
            Expiry::RestoreSpeed(step) => state.speed += step,
            Expiry::EndInvincibility => state.invincible = false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Scheduled {
    id: TimerId,
    due: Duration,
    expiry: Expiry,
}

/// One-shot, cancellable timers running on the game clock.
///
/// The clock only moves when [`EffectTimers::advance`] is called, so the
/// loop driver decides whether it tracks wall time or a virtual clock.
#[derive(Debug)]
pub struct EffectTimers {
    now: Duration,
    next_id: u64,
    pending: Vec<Scheduled>,
    cancel_on_reset: bool,
}

impl EffectTimers {
    pub fn new(cancel_on_reset: bool) -> Self {
        EffectTimers {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
            cancel_on_reset,
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn schedule(&mut self, delay: Duration, expiry: Expiry) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled { id, due: self.now + delay, expiry });
        debug!("Scheduled {:?} as {:?}, due at {:?}", expiry, id, self.now + delay);
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.id != id);
        before != self.pending.len()
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    /// Called when the game resets after a collision. Returns true when the
    /// outstanding effects were dropped, in which case the caller must also
    /// clear whatever those effects would have undone.
    pub fn on_reset(&mut self) -> bool {
        if !self.cancel_on_reset {
            return false;
        }
        let cancelled = self.cancel_all();
        if cancelled > 0 {
            debug!("Reset cancelled {} pending effect timer(s)", cancelled);
        }
        true
    }

    /// Moves the clock forward and fires every timer that came due, earliest
    /// first (ties in scheduling order). Returns how many fired.
    pub fn advance(&mut self, elapsed: Duration, state: &mut GameState) -> usize {
        self.now += elapsed;
        let now = self.now;

        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|timer| {
            if timer.due <= now {
                due.push(Scheduled { id: timer.id, due: timer.due, expiry: timer.expiry });
                false
            } else {
                true
            }
        });
        due.sort_by_key(|timer| (timer.due, timer.id));

        for timer in &due {
            debug!("Timer {:?} fired: {:?}", timer.id, timer.expiry);
            timer.expiry.apply(state);
        }
        due.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn state() -> GameState {
        GameState::new(Grid::new(400, 400, 20), &mut StdRng::seed_from_u64(1))
    }

    #[test]
    fn timer_fires_only_once_due() {
        let mut state = state();
        let mut timers = EffectTimers::new(true);
        state.invincible = true;
        timers.schedule(Duration::from_millis(5000), Expiry::EndInvincibility);

        assert_eq!(timers.advance(Duration::from_millis(4999), &mut state), 0);
        assert!(state.invincible);
        assert_eq!(timers.advance(Duration::from_millis(1), &mut state), 1);
        assert!(!state.invincible);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn earliest_grant_ends_invincibility() {
        let mut state = state();
        let mut timers = EffectTimers::new(true);
        state.invincible = true;
        timers.schedule(Duration::from_millis(5000), Expiry::EndInvincibility);
        timers.advance(Duration::from_millis(3000), &mut state);
        timers.schedule(Duration::from_millis(5000), Expiry::EndInvincibility);

        timers.advance(Duration::from_millis(2000), &mut state);
        assert!(!state.invincible);
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn speed_restore_adds_step_back() {
        let mut state = state();
        let mut timers = EffectTimers::new(true);
        state.speed = Duration::from_millis(120);
        timers.schedule(Duration::from_millis(10), Expiry::RestoreSpeed(Duration::from_millis(30)));
        timers.advance(Duration::from_millis(10), &mut state);
        assert_eq!(state.speed, Duration::from_millis(150));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut state = state();
        let mut timers = EffectTimers::new(true);
        state.invincible = true;
        let id = timers.schedule(Duration::from_millis(10), Expiry::EndInvincibility);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        timers.advance(Duration::from_secs(1), &mut state);
        assert!(state.invincible);
    }

    #[test]
    fn reset_respects_cancel_policy() {
        let mut keep = EffectTimers::new(false);
        keep.schedule(Duration::from_millis(10), Expiry::EndInvincibility);
        assert!(!keep.on_reset());
        assert_eq!(keep.pending(), 1);

        let mut cancel = EffectTimers::new(true);
        cancel.schedule(Duration::from_millis(10), Expiry::EndInvincibility);
        assert!(cancel.on_reset());
        assert_eq!(cancel.pending(), 0);
    }
}
