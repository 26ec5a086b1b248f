//! # CLI Reminder Command
//!
//! One-shot unpaid-dues reminder dispatch for the current month.

use error::Result;

use crate::config::DatabaseConfig;

/// Sends unpaid-dues reminders for the current month, unless the reminder day
/// has not arrived yet or reminders were already sent this month.
pub async fn remind_due(config: &DatabaseConfig) -> Result<()> {
    let state = crate::server::build_state(config, "uploads").await?;

    match server::scheduler::run_reminder_once(&state).await? {
        Some(reminded) => {
            logging::info!(target: "remind_due", reminded, "Reminders dispatched");
        },
        None => {
            logging::info!(target: "remind_due", "No reminders due; nothing to do");
        },
    }

    Ok(())
}
