use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use ecbfx::OutputFormat;
use ecbfx::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch the latest ECB reference rates
    Fetch {
        /// First date of the query window (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last date of the query window (YYYY-MM-DD), defaults to today
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Currencies to fetch, e.g. USD,JPY
        #[arg(long = "country", value_delimiter = ',')]
        countries: Vec<String>,
        /// Write the raw responses and the result table to disk
        #[arg(long)]
        debug: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// List the known source fields
    Fields {
        /// Only show this category
        #[arg(long)]
        category: Option<String>,
    },
}

impl From<Commands> for ecbfx::AppCommand {
    fn from(cmd: Commands) -> ecbfx::AppCommand {
        match cmd {
            Commands::Fetch {
                start,
                end,
                countries,
                debug,
                format,
            } => ecbfx::AppCommand::Fetch(ecbfx::FetchOptions {
                start,
                end,
                countries,
                debug,
                format,
            }),
            Commands::Fields { category } => ecbfx::AppCommand::Fields { category },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => ecbfx::cli::setup::setup(),
        Some(cmd) => ecbfx::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
