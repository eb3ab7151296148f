use std::time::Duration;

use log::info;
use rand::Rng;

use crate::constants::*;
use crate::state::GameState;
use crate::timers::{EffectTimers, Expiry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpEffect {
    /// Shortens the tick interval by `step` (floored at MIN_SPEED) and adds
    /// `step` back after `duration`.
    SpeedBoost { step: Duration, duration: Duration },
    ScoreBonus(u32),
    Invincibility(Duration),
}

/// Outcome weights, in roll order. Weights sum to 1.
pub const POWER_UP_TABLE: [(f64, PowerUpEffect); 3] = [
    (
        SPEED_BOOST_WEIGHT,
        PowerUpEffect::SpeedBoost { step: SPEED_BOOST_STEP, duration: EFFECT_DURATION },
    ),
    (SCORE_BONUS_WEIGHT, PowerUpEffect::ScoreBonus(SCORE_BONUS)),
    (INVINCIBILITY_WEIGHT, PowerUpEffect::Invincibility(EFFECT_DURATION)),
];

impl PowerUpEffect {
    /// Maps a roll in [0, 1) onto the weighted table.
    pub fn from_roll(roll: f64) -> Self {
        let mut threshold = 0.0;
        for (weight, effect) in POWER_UP_TABLE {
            threshold += weight;
            if roll < threshold {
                return effect;
            }
        }
        POWER_UP_TABLE[POWER_UP_TABLE.len() - 1].1
    }

    pub fn roll(rng: &mut impl Rng) -> Self {
        PowerUpEffect::from_roll(rng.gen_range(0.0..1.0))
    }

    pub fn apply(self, state: &mut GameState, timers: &mut EffectTimers) {
        match self {
            PowerUpEffect::SpeedBoost { step, duration } => {
                state.speed = state.speed.saturating_sub(step).max(MIN_SPEED);
                timers.schedule(duration, Expiry::RestoreSpeed(step));
                info!("Speed boost: tick interval now {:?}", state.speed);
            }
            PowerUpEffect::ScoreBonus(amount) => {
                state.score += amount;
                info!("Score bonus +{}: score now {}", amount, state.score);
            }
            PowerUpEffect::Invincibility(duration) => {
                state.invincible = true;
                timers.schedule(duration, Expiry::EndInvincibility);
                info!("Invincible for {:?}", duration);
            }
        }
    }
}
