mod config;
mod game;
mod grid;
mod input;
mod logging;
mod snake;
mod state;
mod term;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{error, info, LevelFilter};

use config::{GameConfig, BOARD_COLS, BOARD_ROWS};
use game::{Flow, SnakeGame};

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Grid snake in the terminal")]
struct Cli {
    /// Board width in cells
    #[arg(long, default_value_t = BOARD_COLS)]
    width: u16,

    /// Board height in cells
    #[arg(long, default_value_t = BOARD_ROWS)]
    height: u16,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level used with --log-file
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup(cli.log_file.as_deref(), cli.log_level)?;

    let config = GameConfig::new(cli.width, cli.height)?.with_seed(cli.seed);
    info!("Starting with {:?}", config);

    let mut game = SnakeGame::new(config)?;

    // Always hand the terminal back, even when setup or a session fails
    let res = run(&mut game);
    let restored = game.restore();

    if let Err(e) = &res {
        error!("{:#}", e);
    }
    res.and(restored)
}

fn run(game: &mut SnakeGame) -> Result<()> {
    game.initialize()?;

    if game.show_intro()? == Flow::Quit {
        return Ok(());
    }

    while game.play()? == Flow::PlayAgain {}

    info!("Quitting");
    Ok(())
}
