//! # CLI Dues Generation Command
//!
//! One-shot regular dues generation for the current month. Useful for
//! deployments that prefer an external cron over the in-process scheduler,
//! and for catching up after downtime.

use error::Result;

use crate::config::DatabaseConfig;

/// Generates the current month's regular dues, unless the month was already
/// generated.
pub async fn generate_dues(config: &DatabaseConfig) -> Result<()> {
    let state = crate::server::build_state(config, "uploads").await?;

    match server::scheduler::run_generation_once(&state).await? {
        Some(summary) => {
            logging::info!(
                target: "generate_dues",
                period = %summary.period,
                created = summary.created,
                skipped = summary.skipped,
                conflicts = summary.conflicts.len(),
                "Dues generation completed"
            );
        },
        None => {
            logging::info!(target: "generate_dues", "Current period already generated; nothing to do");
        },
    }

    Ok(())
}
