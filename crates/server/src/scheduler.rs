//! # In-Process Scheduler
//!
//! A tokio interval task that drives monthly dues generation and the
//! due-date reminder fan-out. Both jobs are guarded against same-period
//! repeats through the settings store, so the tick interval only bounds how
//! quickly a new month is noticed. Missed triggers are not replayed; the CLI
//! subcommands run the same functions for catch-up.

use chrono::{Datelike, Utc};
use entity::dues::{self, DuesStatus, Entity as DuesEntity};
use entity::system_settings::{LAST_GENERATED_PERIOD, LAST_REMINDED_PERIOD};
use entity::users::{self, Entity as UsersEntity};
use error::Result;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};
use std::time::Duration;

use crate::dto::dues::GenerationSummary;
use crate::period::{current_period, FIXED_DUES_AMOUNT};
use crate::{dues as dues_engine, notify, settings, AppState};

/// How often the scheduler wakes up to check for work.
const TICK_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Run monthly generation for the current period, once per period.
///
/// Returns `None` when this period was already generated.
pub async fn run_generation_once(state: &AppState) -> Result<Option<GenerationSummary>> {
    let period = current_period(Utc::now());

    let last = settings::get_setting_value(&state.db, LAST_GENERATED_PERIOD).await?;
    if last.as_deref() == Some(period.as_str()) {
        return Ok(None);
    }

    let summary = dues_engine::generate_periodic(&state.db, &period, FIXED_DUES_AMOUNT, false, None).await?;
    settings::set_setting_value(&state.db, LAST_GENERATED_PERIOD, &period).await?;

    if summary.created > 0 {
        notify::fan_out_to_residents(state, notify::new_iuran(&period, FIXED_DUES_AMOUNT)).await?;
    }

    Ok(Some(summary))
}

/// Fan out due-date reminders to residents with unpaid dues for the current
/// period, once per period, on or after the configured day of month.
///
/// Returns the number of residents notified, or `None` when the reminder is
/// not due or already sent.
pub async fn run_reminder_once(state: &AppState) -> Result<Option<usize>> {
    let now = Utc::now();
    let reminder_day = settings::reminder_day(&state.db).await?;
    if now.day() < reminder_day {
        return Ok(None);
    }

    let period = current_period(now);
    let last = settings::get_setting_value(&state.db, LAST_REMINDED_PERIOD).await?;
    if last.as_deref() == Some(period.as_str()) {
        return Ok(None);
    }

    let debtor_ids: Vec<String> = DuesEntity::find()
        .select_only()
        .column(dues::Column::UserId)
        .filter(dues::Column::Period.eq(period.clone()))
        .filter(dues::Column::Status.eq(DuesStatus::Unpaid))
        .distinct()
        .into_tuple()
        .all(&state.db)
        .await?;

    let debtors = UsersEntity::find()
        .filter(users::Column::Id.is_in(debtor_ids))
        .filter(users::Column::IsDeleted.eq(false))
        .all(&state.db)
        .await?;

    let mut notified = 0;
    for debtor in debtors {
        if debtor.push_token.is_some() {
            notify::dispatch_to_user(state, &debtor.id, debtor.push_token.clone(), notify::jatuh_tempo_reminder(&period));
            notified += 1;
        }
    }

    settings::set_setting_value(&state.db, LAST_REMINDED_PERIOD, &period).await?;

    logging::info!(target: "scheduler", period = %period, notified, "Due-date reminders dispatched");

    Ok(Some(notified))
}

/// Spawn the scheduler loop. Errors are logged and the loop keeps running.
pub fn spawn(state: AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            match run_generation_once(&state).await {
                Ok(Some(summary)) => {
                    logging::info!(
                        target: "scheduler",
                        period = %summary.period,
                        created = summary.created,
                        "Scheduled dues generation ran"
                    );
                },
                Ok(None) => {},
                Err(e) => {
                    logging::error!(target: "scheduler", error = %e, "Scheduled dues generation failed");
                },
            }

            if let Err(e) = run_reminder_once(&state).await {
                logging::error!(target: "scheduler", error = %e, "Reminder fan-out failed");
            }
        }
    })
}
