pub mod cli;
pub mod core;
pub mod export;
pub mod pipeline;
pub mod providers;

use crate::core::config::AppConfig;
use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info};

/// How `fetch` prints the resulting table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Command line overrides for a fetch run; unset values keep the config.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub countries: Vec<String>,
    pub debug: bool,
    pub format: OutputFormat,
}

pub enum AppCommand {
    Fetch(FetchOptions),
    Fields { category: Option<String> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("ECB exchange rates starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Fetch(options) => cli::fetch::run(config, &options).await,
        AppCommand::Fields { category } => cli::fields::run(&config, category.as_deref()),
    }
}
