use std::io;

use clap::Parser;
use log::{error, info};

use gradient_snake::config::{Args, GameConfig};
use gradient_snake::game::{Clock, Game};
use gradient_snake::rendering::OutputTarget;
use gradient_snake::terminal_io::{InputSource, TerminalGuard, TerminalSurface};

fn main() -> io::Result<()> {
    let config = GameConfig::from(Args::parse());
    config.validate()?;

    simple_logging::log_to_file(&config.log_file, config.log_level)?;
    info!("Starting gradient-snake with {:?}", config);

    let grid = config.grid();
    info!("Board {}x{} pixels, {} cols x {} rows", grid.width, grid.height, grid.cols, grid.rows);

    if config.debug {
        info!("Debug mode enabled.");
        let mut game = Game::headless(&config);
        game.on_reset(|event| info!("Reset: {:?}", event));
        return game.run().map_err(|e| { error!("Debug run failed: {}", e); e });
    }

    // Restores the terminal on every exit path below.
    let _guard = TerminalGuard::enter()?;
    TerminalSurface::check_fits(&grid)?;

    let output = OutputTarget::Terminal(TerminalSurface::new(grid));
    let mut game = Game::new(&config, output, InputSource::Terminal, Clock::Real);
    game.on_reset(|event| {
        info!("Game over ({:?}): score {}, length {}", event.cause, event.score, event.length);
    });
    game.run().map_err(|e| { error!("Game loop failed: {}", e); e })?;

    info!("Exiting application.");
    Ok(())
}
