//! # CLI Commands
//!
//! Implementation of CLI commands for the Rukun application.

pub mod completions;
pub mod generate_dues;
pub mod migrate;
pub mod remind_due;
pub mod validate;

use clap::{Args, Subcommand};

/// Available commands for the Rukun CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the API server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Generate regular dues records for the current month
    GenerateDues,

    /// Send unpaid-dues reminders for the current month
    RemindDue,

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Verify configuration
    Validate,
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Server host to bind to
    #[arg(long, env = "RUKUN_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port to bind to
    #[arg(short, long, env = "RUKUN_PORT", default_value = "3000")]
    pub port: u16,

    /// Directory where uploaded proof images are stored
    #[arg(long, env = "RUKUN_UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: String,

    /// Disable the in-process generation/reminder scheduler
    #[arg(long)]
    pub no_scheduler: bool,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Run migrations in dry-run mode (no changes)
    #[arg(long)]
    pub dry_run: bool,

    /// Rollback the last migration
    #[arg(long)]
    pub rollback: bool,
}

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
