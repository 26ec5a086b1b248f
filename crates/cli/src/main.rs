//! # Rukun CLI
//!
//! Command-line interface for the Rukun community backend.
//!
//! ## Usage
//!
//! ```bash
//! rukun serve          # Start the API server (runs migrations automatically)
//! rukun migrate        # Run database migrations and seeds
//! rukun generate-dues  # One-shot dues generation for the current month
//! rukun remind-due     # One-shot unpaid-dues reminders
//! rukun --help         # Show help
//! ```

mod commands;
mod config;
mod server;

use clap::{CommandFactory as _, Parser};
use commands::Commands;
use config::DatabaseConfig;
use error::Result;

/// Rukun - neighborhood administration backend
#[derive(Parser, Debug)]
#[command(name = "rukun")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "RUKUN_LOG_FORMAT", default_value = "pretty")]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    logging::init(&cli.log_level, &cli.log_format, None)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    logging::info!(target: "app", command = ?cli.command, "Rukun CLI starting...");

    match cli.command {
        Commands::Serve(args) => {
            let config = DatabaseConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
            server::serve(&config, &args).await?;
        },
        Commands::Migrate(args) => {
            let config = DatabaseConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
            commands::migrate::migrate(&config, args).await?;
        },
        Commands::GenerateDues => {
            let config = DatabaseConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
            commands::generate_dues::generate_dues(&config).await?;
        },
        Commands::RemindDue => {
            let config = DatabaseConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
            commands::remind_due::remind_due(&config).await?;
        },
        Commands::Completions(args) => {
            commands::completions::completions(args.shell, &mut Cli::command())?;
        },
        Commands::Validate => {
            commands::validate::validate()?;
            logging::info!(target: "validate", "Configuration is valid");
        },
    }

    logging::info!(target: "app", "Rukun CLI completed successfully");
    Ok(())
}
