pub mod config;
pub mod constants;
pub mod game;
pub mod grid;
pub mod input;
pub mod powerups;
pub mod rendering;
pub mod state;
pub mod terminal_io;
pub mod themes;
pub mod timers;
pub mod types;
