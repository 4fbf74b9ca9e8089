use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{Config, WriteLogger};

/// Logs go to a file since the terminal belongs to the game.
pub fn setup(path: Option<&Path>, level: LevelFilter) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => return Ok(()),
    };

    let file = File::create(path).with_context(|| format!("Failed to create log file {}", path.display()))?;
    WriteLogger::init(level, Config::default(), file).context("Failed to initialize logger")?;
    Ok(())
}
