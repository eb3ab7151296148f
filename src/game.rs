use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;
use log::{debug, error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::input::{InputAction, map_event};
use crate::rendering::{OutputTarget, Surface, draw_frame};
use crate::state::{Collision, GameState, TickOutcome};
use crate::terminal_io::{InputSource, SimulatedInput};
use crate::themes::theme;
use crate::timers::EffectTimers;

/// Emitted when a collision sends the game back to its starting layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResetEvent {
    pub cause: Collision,
    /// Score and length of the life that just ended.
    pub score: u32,
    pub length: usize,
    pub frame: u64,
}

pub type ResetHook = Box<dyn FnMut(&ResetEvent)>;

/// How waiting for the next tick passes time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Clock {
    /// Sleep for real while polling the terminal.
    Real,
    /// Jump straight to the deadline.
    Virtual,
}

pub struct Game {
    pub state: GameState,
    pub timers: EffectTimers,
    rng: StdRng,
    output: OutputTarget,
    input: InputSource,
    clock: Clock,
    debug_mode_active: bool,
    max_frames: Option<u64>,
    frame_count: u64,
    resets: u64,
    running: bool,
    reset_hooks: Vec<ResetHook>,
    /// Last point the effect timers were advanced to, on the real clock.
    clock_mark: Instant,
}

impl Game {
    pub fn new(config: &GameConfig, output: OutputTarget, input: InputSource, clock: Clock) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!("Game seed: {}", seed);
        let mut rng = StdRng::seed_from_u64(seed);
        let state = GameState::new(config.grid(), &mut rng);
        Game {
            state,
            timers: EffectTimers::new(config.cancel_effects_on_reset),
            rng,
            output,
            input,
            clock,
            debug_mode_active: config.debug,
            max_frames: config.max_frames,
            frame_count: 0,
            resets: 0,
            running: true,
            reset_hooks: Vec::new(),
            clock_mark: Instant::now(),
        }
    }

    /// Headless game: ScreenBuffer output, scripted input, virtual clock.
    pub fn headless(config: &GameConfig) -> Self {
        let output = OutputTarget::ScreenBuffer(crate::rendering::ScreenBuffer::new(config.grid()));
        let input = InputSource::Simulated(SimulatedInput::new(config.script.0.clone()));
        Game::new(config, output, input, Clock::Virtual)
    }

    /// Registers a callback run after every collision reset.
    pub fn on_reset(&mut self, hook: impl FnMut(&ResetEvent) + 'static) {
        self.reset_hooks.push(Box::new(hook));
    }

    pub fn output(&self) -> &OutputTarget {
        &self.output
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn resets(&self) -> u64 {
        self.resets
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Wait, tick, draw, repeat, until quit or the frame limit.
    pub fn run(&mut self) -> io::Result<()> {
        info!("Game loop started.");
        self.clock_mark = Instant::now();
        self.render()?;

        while self.running && self.max_frames.is_none_or(|max| self.frame_count < max) {
            self.cycle()?;
        }

        info!(
            "Game loop ended after {} ticks, {} resets. High score: {}",
            self.frame_count, self.resets, self.state.high_score
        );
        Ok(())
    }

    /// One wait, tick and draw. A quit during the wait skips the tick.
    pub fn cycle(&mut self) -> io::Result<()> {
        // Re-read every cycle so a boost applies to the very next wait.
        let interval = self.state.speed;
        self.wait(interval)?;
        if !self.running {
            return Ok(());
        }
        self.step();
        self.render()?;
        self.frame_count += 1;
        Ok(())
    }

    /// Lets `interval` pass, handling input and firing due effect timers.
    fn wait(&mut self, interval: Duration) -> io::Result<()> {
        match self.clock {
            Clock::Virtual => {
                while let Some(event) = self.input.next_event(self.frame_count, Duration::ZERO)? {
                    self.handle_event(event)?;
                }
                self.timers.advance(interval, &mut self.state);
            }
            Clock::Real => {
                // Time spent ticking and drawing since the last wait counts too.
                let deadline = Instant::now() + interval;
                loop {
                    let now = Instant::now();
                    self.timers.advance(now - self.clock_mark, &mut self.state);
                    self.clock_mark = now;
                    if now >= deadline || !self.running {
                        break;
                    }
                    if let Some(event) = self.input.next_event(self.frame_count, deadline - now)? {
                        self.handle_event(event)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match map_event(&event) {
            InputAction::Steer(direction) => {
                if !self.state.steer(direction) {
                    debug!("Ignored reversal to {:?}", direction);
                }
            }
            InputAction::CycleTheme => {
                self.state.cycle_theme();
                info!("Theme changed to {}", theme(self.state.theme_index).name);
            }
            InputAction::Quit => {
                info!("Quit requested. Exiting game loop.");
                self.running = false;
            }
            InputAction::Ignore => {
                if let (Event::Resize(width, height), OutputTarget::Terminal(terminal)) = (&event, &mut self.output) {
                    info!("Terminal resized to {}x{}", width, height);
                    terminal.invalidate()?;
                }
            }
        }
        Ok(())
    }

    /// One tick of game logic; resets are forwarded to the hooks.
    pub fn step(&mut self) -> TickOutcome {
        let score = self.state.score;
        let length = self.state.snake.len();
        let outcome = self.state.tick(&mut self.timers, &mut self.rng);

        match outcome {
            TickOutcome::Reset(cause) => {
                self.resets += 1;
                let event = ResetEvent { cause, score, length, frame: self.frame_count };
                for hook in &mut self.reset_hooks {
                    hook(&event);
                }
            }
            TickOutcome::Ate { power_up_spawned, .. } => {
                debug!("Ate food, score {}, power-up spawned: {}", self.state.score, power_up_spawned);
            }
            TickOutcome::Moved { .. } => {}
        }
        outcome
    }

    fn render(&mut self) -> io::Result<()> {
        draw_frame(&self.state, &mut self.output);
        self.output.present().map_err(|e| { error!("Failed to present frame: {}", e); e })?;
        if self.debug_mode_active {
            if let OutputTarget::ScreenBuffer(sb) = &self.output {
                sb.print_to_log();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Script, parse_script};
    use crate::powerups::PowerUpEffect;
    use crate::types::{Cell, Direction};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn config(script: &str, frames: u64) -> GameConfig {
        GameConfig {
            seed: Some(17),
            max_frames: Some(frames),
            script: parse_script(script).unwrap_or(Script(Vec::new())),
            ..GameConfig::default()
        }
    }

    #[test]
    fn runs_until_frame_limit() {
        let mut game = Game::headless(&config("", 3));
        game.state.food = Cell::new(0, 0);
        game.run().unwrap();
        assert_eq!(game.frame_count(), 3);
        assert_eq!(game.state.head(), Cell::new(160, 100));
        match game.output() {
            OutputTarget::ScreenBuffer(sb) => assert_eq!(sb.frames_presented, 4),
            OutputTarget::Terminal(_) => panic!("expected a screen buffer"),
        }
    }

    #[test]
    fn scripted_turn_applies_before_the_tick() {
        let mut game = Game::headless(&config("0:down", 1));
        game.state.food = Cell::new(0, 0);
        game.run().unwrap();
        assert_eq!(game.state.direction, Direction::Down);
        assert_eq!(game.state.head(), Cell::new(100, 120));
    }

    #[test]
    fn quit_stops_before_ticking() {
        let mut game = Game::headless(&config("2:quit", 50));
        game.state.food = Cell::new(0, 0);
        game.run().unwrap();
        assert!(!game.is_running());
        assert_eq!(game.frame_count(), 2);
    }

    #[test]
    fn theme_key_cycles_theme() {
        let mut game = Game::headless(&config("0:theme,1:theme", 2));
        game.state.food = Cell::new(0, 0);
        game.run().unwrap();
        assert_eq!(game.state.theme_index, 2);
    }

    #[test]
    fn reset_hooks_see_the_life_that_ended() {
        let seen: Rc<RefCell<Vec<ResetEvent>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        // Straight right from (100,100) leaves a 400px board on tick 15.
        let mut game = Game::headless(&config("", 15));
        game.state.food = Cell::new(0, 380);
        game.on_reset(move |event| sink.borrow_mut().push(*event));
        game.run().unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].cause, Collision::Wall);
        assert_eq!(seen[0].length, 1);
        assert_eq!(seen[0].frame, 14);
        assert_eq!(game.resets(), 1);
        assert_eq!(game.state.head(), Cell::new(100, 100));
    }

    #[test]
    fn virtual_clock_expires_effects() {
        let mut game = Game::headless(&config("", 10));
        game.state.food = Cell::new(380, 380);
        game.state.snake = vec![Cell::new(0, 0)];
        game.state.direction = Direction::Down;
        game.state.pending_direction = Direction::Down;
        game.state.invincible = true;
        game.timers.schedule(Duration::from_millis(1000), crate::timers::Expiry::EndInvincibility);
        game.run().unwrap();
        // 10 ticks at 150ms each, no reset on the way down.
        assert_eq!(game.resets(), 0);
        assert_eq!(game.timers.now(), Duration::from_millis(1500));
        assert!(!game.state.invincible);
    }

    #[test]
    fn boost_shortens_the_very_next_wait() {
        let mut game = Game::headless(&config("", 0));
        game.state.food = Cell::new(0, 380);

        game.cycle().unwrap();
        assert_eq!(game.timers.now(), Duration::from_millis(150));

        PowerUpEffect::from_roll(0.1).apply(&mut game.state, &mut game.timers);
        game.cycle().unwrap();
        assert_eq!(game.timers.now(), Duration::from_millis(270));
        game.cycle().unwrap();
        assert_eq!(game.timers.now(), Duration::from_millis(390));
        assert_eq!(game.frame_count(), 3);
    }

    #[test]
    fn real_clock_counts_time_spent_outside_the_wait() {
        let config = config("", 4);
        let output = OutputTarget::ScreenBuffer(crate::rendering::ScreenBuffer::new(config.grid()));
        let input = InputSource::Simulated(SimulatedInput::new(Vec::new()));
        let mut game = Game::new(&config, output, input, Clock::Real);
        game.state.food = Cell::new(0, 380);
        game.state.snake = vec![Cell::new(380, 0)];
        game.on_reset(|_| std::thread::sleep(Duration::from_millis(200)));

        let started = Instant::now();
        game.run().unwrap();
        let wall = started.elapsed();

        assert_eq!(game.resets(), 1);
        // Four 150ms waits plus the 200ms hook.
        assert!(game.timers.now() >= Duration::from_millis(800), "timer clock {:?}", game.timers.now());
        assert!(game.timers.now() <= wall);
    }
}
