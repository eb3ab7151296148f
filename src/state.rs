use std::time::Duration;

use log::{debug, info};
use rand::Rng;

use crate::constants::*;
use crate::grid::Grid;
use crate::powerups::PowerUpEffect;
use crate::themes::next_theme_index;
use crate::timers::EffectTimers;
use crate::types::{Cell, Direction};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

/// What a single tick did to the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved { power_up: Option<PowerUpEffect> },
    Ate { power_up_spawned: bool, power_up: Option<PowerUpEffect> },
    Reset(Collision),
}

/// The whole session: board, snake, pickups and scoring.
#[derive(Debug)]
pub struct GameState {
    pub grid: Grid,
    /// Head first.
    pub snake: Vec<Cell>,
    /// Direction the last tick moved in.
    pub direction: Direction,
    /// Direction the next tick will move in.
    pub pending_direction: Direction,
    pub food: Cell,
    pub power_up: Option<Cell>,
    pub score: u32,
    pub high_score: u32,
    pub speed: Duration,
    pub invincible: bool,
    pub theme_index: usize,
}

impl GameState {
    pub fn new(grid: Grid, rng: &mut impl Rng) -> Self {
        GameState {
            grid,
            snake: vec![Self::initial_cell(&grid)],
            direction: Direction::Right,
            pending_direction: Direction::Right,
            food: grid.random_cell(rng),
            power_up: None,
            score: 0,
            high_score: 0,
            speed: DEFAULT_SPEED,
            invincible: false,
            theme_index: 0,
        }
    }

    pub fn initial_cell(grid: &Grid) -> Cell {
        grid.cell_at(INITIAL_CELL_INDEX, INITIAL_CELL_INDEX)
    }

    pub fn head(&self) -> Cell {
        self.snake[0]
    }

    /// Queues a turn for the next tick. A turn straight back into the
    /// direction the snake last moved is ignored, not queued.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if direction == self.direction.opposite() {
            return false;
        }
        self.pending_direction = direction;
        true
    }

    pub fn cycle_theme(&mut self) {
        self.theme_index = next_theme_index(self.theme_index);
    }

    /// Advances the snake by one cell.
    pub fn tick(&mut self, timers: &mut EffectTimers, rng: &mut impl Rng) -> TickOutcome {
        self.direction = self.pending_direction;
        let head = self.head().step(self.direction, self.grid.cell_size());

        if !self.grid.contains(head) {
            return self.reset(Collision::Wall, timers);
        }
        if !self.invincible && self.snake.contains(&head) {
            return self.reset(Collision::Body, timers);
        }

        self.snake.insert(0, head);

        let mut ate = None;
        if head == self.food {
            self.score += 1;
            self.food = self.grid.random_cell(rng);
            let spawn = self.power_up.is_none() && rng.gen_bool(POWER_UP_SPAWN_CHANCE);
            if spawn {
                let cell = self.grid.random_cell(rng);
                debug!("Power-up spawned at {:?}", cell);
                self.power_up = Some(cell);
            }
            ate = Some(spawn);
        } else {
            self.snake.pop();
        }

        let mut consumed = None;
        if self.power_up == Some(head) {
            let effect = PowerUpEffect::roll(rng);
            effect.apply(self, timers);
            self.power_up = None;
            consumed = Some(effect);
        }

        self.high_score = self.high_score.max(self.score);

        match ate {
            Some(power_up_spawned) => TickOutcome::Ate { power_up_spawned, power_up: consumed },
            None => TickOutcome::Moved { power_up: consumed },
        }
    }

    /// Back to the starting layout. Food, high score and theme carry over.
    fn reset(&mut self, cause: Collision, timers: &mut EffectTimers) -> TickOutcome {
        info!("Collision with {:?} at length {}, score {}. Resetting.", cause, self.snake.len(), self.score);
        self.snake = vec![Self::initial_cell(&self.grid)];
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.score = 0;
        self.speed = DEFAULT_SPEED;
        self.power_up = None;
        if timers.on_reset() {
            self.invincible = false;
        }
        TickOutcome::Reset(cause)
    }
}
