use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::event::Event;
use log::LevelFilter;

use crate::constants::*;
use crate::grid::Grid;
use crate::input::key_from_name;

#[derive(Parser, Debug)]
#[command(name = "gradient-snake", about = "Snake with gradients, power-ups and themes")]
pub struct Args {
    /// Board width in pixels
    #[arg(long, default_value_t = DEFAULT_BOARD_WIDTH)]
    pub width: u32,

    /// Board height in pixels
    #[arg(long, default_value_t = DEFAULT_BOARD_HEIGHT)]
    pub height: u32,

    /// Cell size in pixels
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE)]
    pub cell_size: u32,

    /// Seed for a reproducible game
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run headless on a virtual clock, logging every frame
    #[arg(long)]
    pub debug: bool,

    /// Stop after this many ticks
    #[arg(long)]
    pub frames: Option<u64>,

    /// Scripted input for debug runs, e.g. "3:down,8:left,10:theme"
    #[arg(long, value_parser = parse_script)]
    pub script: Option<Script>,

    #[arg(long, default_value = "gradient-snake.log")]
    pub log_file: PathBuf,

    #[arg(long, default_value_t = LevelFilter::Info, value_parser = parse_level)]
    pub log_level: LevelFilter,

    /// Let power-up timers outlive a reset instead of cancelling them
    #[arg(long)]
    pub keep_effects_on_reset: bool,
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    raw.parse::<LevelFilter>().map_err(|e| format!("{}: {}", raw, e))
}

/// Frame-indexed key events.
#[derive(Clone, Debug, PartialEq)]
pub struct Script(pub Vec<(u64, Event)>);

pub fn parse_script(raw: &str) -> Result<Script, String> {
    let mut events = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let (frame, key) = entry
            .split_once(':')
            .ok_or_else(|| format!("expected FRAME:KEY, got '{}'", entry))?;
        let frame = frame
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("bad frame in '{}': {}", entry, e))?;
        let key = key_from_name(key.trim()).ok_or_else(|| format!("unknown key in '{}'", entry))?;
        events.push((frame, Event::Key(key.into())));
    }
    Ok(Script(events))
}

fn default_debug_script() -> Script {
    // A lap around the start cell, with a theme change on the way.
    parse_script("3:down,6:left,9:theme,10:up,14:right").unwrap_or(Script(Vec::new()))
}

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub width: u32,
    pub height: u32,
    pub cell_size: u32,
    pub seed: Option<u64>,
    pub debug: bool,
    pub max_frames: Option<u64>,
    pub script: Script,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub cancel_effects_on_reset: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            seed: None,
            debug: false,
            max_frames: None,
            script: Script(Vec::new()),
            log_file: PathBuf::from("gradient-snake.log"),
            log_level: LevelFilter::Info,
            cancel_effects_on_reset: true,
        }
    }
}

impl From<Args> for GameConfig {
    fn from(args: Args) -> Self {
        let max_frames = match (args.frames, args.debug) {
            (Some(frames), _) => Some(frames),
            (None, true) => Some(DEBUG_DEFAULT_FRAMES),
            (None, false) => None,
        };
        let script = match (args.script, args.debug) {
            (Some(script), _) => script,
            (None, true) => default_debug_script(),
            (None, false) => Script(Vec::new()),
        };
        GameConfig {
            width: args.width,
            height: args.height,
            cell_size: args.cell_size,
            seed: args.seed,
            debug: args.debug,
            max_frames,
            script,
            log_file: args.log_file,
            log_level: args.log_level,
            cancel_effects_on_reset: !args.keep_effects_on_reset,
        }
    }
}

impl GameConfig {
    pub fn grid(&self) -> Grid {
        Grid::new(self.width, self.height, self.cell_size)
    }

    /// Board must divide evenly into cells and hold the starting cell.
    pub fn validate(&self) -> io::Result<()> {
        fn invalid(msg: String) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::InvalidInput, msg))
        }
        if self.cell_size == 0 {
            return invalid("cell size must be positive".to_string());
        }
        if self.width % self.cell_size != 0 || self.height % self.cell_size != 0 {
            return invalid(format!(
                "board {}x{} is not a multiple of cell size {}",
                self.width, self.height, self.cell_size
            ));
        }
        let needed = INITIAL_CELL_INDEX as u32 + 1;
        if self.width / self.cell_size < needed || self.height / self.cell_size < needed {
            return invalid(format!("board must be at least {} cells in each direction", needed));
        }
        Ok(())
    }
}
