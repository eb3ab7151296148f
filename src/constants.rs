use std::time::Duration;

// --- Board ---
pub const DEFAULT_BOARD_WIDTH: u32 = 400;
pub const DEFAULT_BOARD_HEIGHT: u32 = 400;
pub const DEFAULT_CELL_SIZE: u32 = 20;
pub const INITIAL_CELL_INDEX: i32 = 5; // Snake starts at (5, 5) in cell units

// --- Tick pacing ---
pub const DEFAULT_SPEED: Duration = Duration::from_millis(150);
pub const MIN_SPEED: Duration = Duration::from_millis(30);
pub const SPEED_BOOST_STEP: Duration = Duration::from_millis(30);

// --- Power-ups ---
pub const POWER_UP_SPAWN_CHANCE: f64 = 0.3; // Rolled on each food eaten
pub const SPEED_BOOST_WEIGHT: f64 = 0.4;
pub const SCORE_BONUS_WEIGHT: f64 = 0.4;
pub const INVINCIBILITY_WEIGHT: f64 = 0.2;
pub const SCORE_BONUS: u32 = 5;
pub const EFFECT_DURATION: Duration = Duration::from_millis(5000);

// --- Rendering ---
pub const RADIAL_INNER_RADIUS: f64 = 5.0;
pub const HEAD_HIGHLIGHT: u32 = 0xffffff;
pub const SEGMENT_SHADE: u32 = 0x555555;
pub const FOOD_SHADE: u32 = 0x000000;
pub const POWER_UP_SHADE: u32 = 0x444444;

// --- Debug mode ---
pub const DEBUG_DEFAULT_FRAMES: u64 = 200;
