//! # Dues Generation Engine
//!
//! Record creation for the three generation flavors plus the back-fill runs
//! that accompany resident registration and restoration. All functions
//! operate per resident, per period, sequentially, and report per-item
//! accounting rather than aborting a batch.
//!
//! Regular records are deduplicated per (resident, period). Under the
//! `strict_period_uniqueness` setting a duplicate is a reported conflict;
//! otherwise it is skipped silently, which makes generation idempotent.
//! Custom records are never deduplicated.

use chrono::{Datelike, Utc};
use entity::dues::{self, DuesStatus, DuesType, Entity as DuesEntity};
use entity::system_settings::STRICT_PERIOD_UNIQUENESS;
use entity::users::{self, Entity as UsersEntity, Role, UserStatus};
use error::Result;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::dto::dues::{
    GenerationConflict,
    GenerationSummary,
    StatusSummaryResponse,
    YearlyGenerationSummary,
    YearlyResidentOutcome,
};
use crate::period::{self, FIXED_DUES_AMOUNT};
use crate::settings;

/// What happened for one (resident, period) during regular generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(Box<dues::Model>),
    /// A regular record already existed and strict uniqueness is off.
    Skipped,
    /// A regular record already existed and strict uniqueness is on.
    Conflict,
}

/// Residents eligible for dues generation.
///
/// The admin account is a system operator, never a payer. Soft-deleted
/// residents are always excluded; inactive/away ones only by request.
pub async fn eligible_residents(
    db: &DatabaseConnection,
    include_inactive: bool,
    target_users: Option<&[String]>,
) -> Result<Vec<users::Model>> {
    let mut query = UsersEntity::find()
        .filter(users::Column::Role.ne(Role::Admin))
        .filter(users::Column::IsDeleted.eq(false));

    if !include_inactive {
        query = query.filter(users::Column::Status.eq(UserStatus::Active));
    }

    if let Some(ids) = target_users {
        query = query.filter(users::Column::Id.is_in(ids.iter().cloned()));
    }

    Ok(query.all(db).await?)
}

/// Create one `unpaid` regular record, deduplicated per (resident, period).
pub async fn create_regular_record(
    db: &DatabaseConnection,
    user_id: &str,
    period: &str,
    amount: Decimal,
    strict: bool,
) -> Result<CreateOutcome> {
    let existing = DuesEntity::find()
        .filter(dues::Column::UserId.eq(user_id))
        .filter(dues::Column::Period.eq(period))
        .filter(dues::Column::DuesType.eq(DuesType::Regular))
        .one(db)
        .await?;

    if existing.is_some() {
        return Ok(if strict { CreateOutcome::Conflict } else { CreateOutcome::Skipped });
    }

    let now = Utc::now();
    let model = dues::ActiveModel {
        id:             Set(entity::new_id("iur")),
        user_id:        Set(user_id.to_string()),
        period:         Set(period.to_string()),
        amount:         Set(amount),
        status:         Set(DuesStatus::Unpaid),
        dues_type:      Set(DuesType::Regular),
        description:    Set(None),
        proof_image:    Set(None),
        submitted_at:   Set(None),
        confirmed_at:   Set(None),
        confirmed_by:   Set(None),
        recorded_by:    Set(None),
        paid_at:        Set(None),
        payment_method: Set(None),
        note:           Set(None),
        is_imported:    Set(false),
        created_at:     Set(now),
        updated_at:     Set(now),
    }
    .insert(db)
    .await?;

    Ok(CreateOutcome::Created(Box::new(model)))
}

/// Generate one `unpaid` regular record per eligible resident for a period.
///
/// Idempotent: a second run for the same period creates nothing under the
/// default lax setting.
pub async fn generate_periodic(
    db: &DatabaseConnection,
    period: &str,
    amount: Decimal,
    include_inactive: bool,
    target_users: Option<&[String]>,
) -> Result<GenerationSummary> {
    period::parse_period(period)?;
    let strict = settings::is_setting_enabled(db, STRICT_PERIOD_UNIQUENESS).await?;
    let residents = eligible_residents(db, include_inactive, target_users).await?;

    let mut summary = GenerationSummary {
        period:    period.to_string(),
        created:   0,
        skipped:   0,
        conflicts: Vec::new(),
    };

    for resident in &residents {
        match create_regular_record(db, &resident.id, period, amount, strict).await? {
            CreateOutcome::Created(_) => summary.created += 1,
            CreateOutcome::Skipped => summary.skipped += 1,
            CreateOutcome::Conflict => summary.conflicts.push(GenerationConflict {
                user_id: resident.id.clone(),
                period:  period.to_string(),
                reason:  "Regular dues already exist for this period".to_string(),
            }),
        }
    }

    logging::info!(
        target: "dues",
        period = %period,
        created = summary.created,
        skipped = summary.skipped,
        conflicts = summary.conflicts.len(),
        "Periodic dues generation finished"
    );

    Ok(summary)
}

/// Generate regular records for all twelve periods of a year, skipping
/// existing ones, with per-resident created/skipped counts.
pub async fn generate_yearly(
    db: &DatabaseConnection,
    year: i32,
    amount: Decimal,
    target_users: Option<&[String]>,
) -> Result<YearlyGenerationSummary> {
    let residents = eligible_residents(db, false, target_users).await?;
    let periods = period::periods_between(year, 1, year, 12);

    let mut summary = YearlyGenerationSummary {
        year,
        total_created: 0,
        total_skipped: 0,
        residents: Vec::new(),
    };

    for resident in &residents {
        let mut outcome = YearlyResidentOutcome {
            user_id: resident.id.clone(),
            created: 0,
            skipped: 0,
        };

        for p in &periods {
            // Yearly generation always skips duplicates; it exists to fill
            // gaps, so strict mode would only produce noise.
            match create_regular_record(db, &resident.id, p, amount, false).await? {
                CreateOutcome::Created(_) => outcome.created += 1,
                _ => outcome.skipped += 1,
            }
        }

        summary.total_created += outcome.created;
        summary.total_skipped += outcome.skipped;
        summary.residents.push(outcome);
    }

    logging::info!(
        target: "dues",
        year,
        created = summary.total_created,
        skipped = summary.total_skipped,
        "Yearly dues generation finished"
    );

    Ok(summary)
}

/// Generate one custom-type record per eligible resident. Never
/// deduplicated; two levies for the same period coexist.
pub async fn generate_custom(
    db: &DatabaseConnection,
    period: &str,
    amount: Decimal,
    description: &str,
    target_users: Option<&[String]>,
) -> Result<usize> {
    period::parse_period(period)?;
    let residents = eligible_residents(db, false, target_users).await?;

    let now = Utc::now();
    let mut created = 0;
    for resident in &residents {
        dues::ActiveModel {
            id:             Set(entity::new_id("iur")),
            user_id:        Set(resident.id.clone()),
            period:         Set(period.to_string()),
            amount:         Set(amount),
            status:         Set(DuesStatus::Unpaid),
            dues_type:      Set(DuesType::Custom),
            description:    Set(Some(description.to_string())),
            proof_image:    Set(None),
            submitted_at:   Set(None),
            confirmed_at:   Set(None),
            confirmed_by:   Set(None),
            recorded_by:    Set(None),
            paid_at:        Set(None),
            payment_method: Set(None),
            note:           Set(None),
            is_imported:    Set(false),
            created_at:     Set(now),
            updated_at:     Set(now),
        }
        .insert(db)
        .await?;
        created += 1;
    }

    logging::info!(
        target: "dues",
        period = %period,
        description = %description,
        created,
        "Custom dues generation finished"
    );

    Ok(created)
}

/// Back-fill regular records for one resident from a starting month through
/// December of the same year.
///
/// Runs on registration (from the creation month) and on restoration (from
/// the restoration month). Existing records are skipped, so a restore after
/// a short deletion window fills only the gap.
pub async fn backfill_for_resident(db: &DatabaseConnection, user_id: &str, from: chrono::DateTime<Utc>) -> Result<usize> {
    let year = from.year();
    let month = from.month();
    let periods = period::periods_between(year, month, year, 12);

    let mut created = 0;
    for p in &periods {
        if let CreateOutcome::Created(_) = create_regular_record(db, user_id, p, FIXED_DUES_AMOUNT, false).await? {
            created += 1;
        }
    }

    logging::info!(target: "dues", user_id = %user_id, created, "Back-filled dues records");

    Ok(created)
}

/// Fold a period's statuses into zero-filled counts.
pub fn summarize_statuses(period: &str, statuses: &[DuesStatus]) -> StatusSummaryResponse {
    let mut summary = StatusSummaryResponse {
        period:   period.to_string(),
        paid:     0,
        pending:  0,
        rejected: 0,
        unpaid:   0,
        total:    0,
    };

    for status in statuses {
        match status {
            DuesStatus::Paid => summary.paid += 1,
            DuesStatus::Pending => summary.pending += 1,
            DuesStatus::Rejected => summary.rejected += 1,
            DuesStatus::Unpaid => summary.unpaid += 1,
        }
        summary.total += 1;
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_statuses_zero_filled() {
        let summary = summarize_statuses("2025-04", &[]);
        assert_eq!(summary.period, "2025-04");
        assert_eq!(summary.paid, 0);
        assert_eq!(summary.pending, 0);
        assert_eq!(summary.rejected, 0);
        assert_eq!(summary.unpaid, 0);
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn test_summarize_statuses_counts() {
        let statuses = [
            DuesStatus::Paid,
            DuesStatus::Paid,
            DuesStatus::Pending,
            DuesStatus::Unpaid,
            DuesStatus::Rejected,
            DuesStatus::Unpaid,
        ];
        let summary = summarize_statuses("2025-04", &statuses);
        assert_eq!(summary.paid, 2);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.unpaid, 2);
        assert_eq!(summary.total, 6);
    }
}
