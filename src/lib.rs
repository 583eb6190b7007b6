pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod summary;
pub mod version;

pub use error::{AppError, AppResult};
pub use cli::Cli;

use clap::Parser;
use config::{PluginConfig, Sources};
use version::Version;

/// Main library entry point
pub fn run() -> AppResult<()> {
    let version = Version::current();
    println!("{}", version.to_json()?);

    let cli = Cli::parse();
    let sources = Sources::from_process();
    logging::init_logging(sources.log_level(cli.log_level.clone())?);

    let config = PluginConfig::load(cli, &sources)?;

    commands::summary::run_summary(config)
}
