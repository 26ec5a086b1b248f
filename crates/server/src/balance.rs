//! # Balance Engine
//!
//! Live aggregation of the community treasury. Nothing is cached: every
//! read recomputes
//! `initial_balance + paid non-imported dues + completed-event donations
//! - expenses`.
//!
//! Imported paid dues are excluded from income because the sheet they came
//! from predates the system's bookkeeping; counting them would double the
//! opening balance the administrator already set.

use ::auth::permissions::BalanceAction;
use ::auth::Permission;
use axum::Json;
use entity::dues::{self, DuesStatus, Entity as DuesEntity};
use entity::events::{self, Entity as EventsEntity, EventStatus};
use entity::expenses::Entity as ExpensesEntity;
use error::Result;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;

use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::permissions::check_permission;
use crate::{settings, AppState};

/// One completed event's contribution to income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventContribution {
    pub id:              String,
    pub name:            String,
    pub total_donations: Decimal,
    pub completed_at:    Option<chrono::DateTime<chrono::Utc>>,
}

/// The balance report returned by the report endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    pub initial_balance:       Decimal,
    /// Dues income plus event donations
    pub total_income:          Decimal,
    pub total_iuran_income:    Decimal,
    pub total_event_donations: Decimal,
    pub total_expense:         Decimal,
    pub balance:               Decimal,
    /// Completed events contributing donations
    pub events:                Vec<EventContribution>,
}

/// Compute the report from raw figures. Pure.
///
/// `paid_dues` carries (amount, is_imported) per paid record; imported ones
/// are excluded from income.
pub fn compute_report(
    initial_balance: Decimal,
    paid_dues: &[(Decimal, bool)],
    event_contributions: Vec<EventContribution>,
    expense_totals: &[Decimal],
) -> BalanceReport {
    let total_iuran_income: Decimal = paid_dues
        .iter()
        .filter(|(_, is_imported)| !is_imported)
        .map(|(amount, _)| *amount)
        .sum();

    let total_event_donations: Decimal = event_contributions.iter().map(|e| e.total_donations).sum();
    let total_expense: Decimal = expense_totals.iter().copied().sum();
    let total_income = total_iuran_income + total_event_donations;

    BalanceReport {
        initial_balance,
        total_income,
        total_iuran_income,
        total_event_donations,
        total_expense,
        balance: initial_balance + total_income - total_expense,
        events: event_contributions,
    }
}

/// Assemble the report from the database.
pub async fn build_report(state: &AppState) -> Result<BalanceReport> {
    let initial = settings::initial_balance(&state.db).await?;

    let paid_dues: Vec<(Decimal, bool)> = DuesEntity::find()
        .filter(dues::Column::Status.eq(DuesStatus::Paid))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|d| (d.amount, d.is_imported))
        .collect();

    let event_contributions: Vec<EventContribution> = EventsEntity::find()
        .filter(events::Column::Status.eq(EventStatus::Completed))
        .order_by_asc(events::Column::EventDate)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|e| EventContribution {
            id:              e.id,
            name:            e.name,
            total_donations: e.total_donations,
            completed_at:    e.completed_at,
        })
        .collect();

    let expense_totals: Vec<Decimal> = ExpensesEntity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|e| e.total)
        .collect();

    Ok(compute_report(initial, &paid_dues, event_contributions, &expense_totals))
}

/// Current balance figure only.
pub async fn current_balance(state: &AppState) -> Result<Decimal> {
    Ok(build_report(state).await?.balance)
}

/// Advisory guard used before creating or growing an expense.
///
/// Read-then-act: a concurrent expense may still overdraw. The check exists
/// to stop obvious mistakes, not to serialize the treasury.
pub async fn ensure_covered(state: &AppState, requested: Decimal) -> Result<()> {
    let balance = current_balance(state).await?;
    if requested > balance {
        return Err(error::AppError::insufficient_balance(balance, requested));
    }
    Ok(())
}

/// Inner handler: the balance report endpoint.
pub async fn balance_report_inner(state: &AppState, user: &AuthenticatedUser) -> Result<Json<BalanceReport>> {
    check_permission(user, Permission::Balance(BalanceAction::Read))?;
    Ok(Json(build_report(state).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(name: &str, donations: i64) -> EventContribution {
        EventContribution {
            id:              format!("evt_{}", name),
            name:            name.to_string(),
            total_donations: Decimal::new(donations, 0),
            completed_at:    Some(chrono::Utc::now()),
        }
    }

    #[test]
    fn test_empty_report_is_initial_balance() {
        let report = compute_report(Decimal::new(100_000, 0), &[], vec![], &[]);
        assert_eq!(report.balance, Decimal::new(100_000, 0));
        assert_eq!(report.total_income, Decimal::ZERO);
        assert_eq!(report.total_expense, Decimal::ZERO);
    }

    #[test]
    fn test_formula_combines_all_sources() {
        let paid = [
            (Decimal::new(50_000, 0), false),
            (Decimal::new(50_000, 0), false),
        ];
        let events = vec![contribution("agustusan", 300_000)];
        let expenses = [Decimal::new(120_000, 0)];

        let report = compute_report(Decimal::new(10_000, 0), &paid, events, &expenses);
        assert_eq!(report.total_iuran_income, Decimal::new(100_000, 0));
        assert_eq!(report.total_event_donations, Decimal::new(300_000, 0));
        assert_eq!(report.total_income, Decimal::new(400_000, 0));
        assert_eq!(report.total_expense, Decimal::new(120_000, 0));
        assert_eq!(report.balance, Decimal::new(290_000, 0));
    }

    #[test]
    fn test_imported_paid_dues_are_excluded() {
        let paid = [
            (Decimal::new(50_000, 0), false),
            (Decimal::new(50_000, 0), true),
            (Decimal::new(50_000, 0), true),
        ];
        let report = compute_report(Decimal::ZERO, &paid, vec![], &[]);
        assert_eq!(report.total_iuran_income, Decimal::new(50_000, 0));
        assert_eq!(report.balance, Decimal::new(50_000, 0));
    }

    #[test]
    fn test_balance_can_go_negative() {
        let report = compute_report(Decimal::ZERO, &[], vec![], &[Decimal::new(75_000, 0)]);
        assert_eq!(report.balance, Decimal::new(-75_000, 0));
    }

    #[test]
    fn test_events_list_preserved_in_report() {
        let events = vec![contribution("a", 100), contribution("b", 200)];
        let report = compute_report(Decimal::ZERO, &[], events, &[]);
        assert_eq!(report.events.len(), 2);
        assert_eq!(report.events[1].total_donations, Decimal::new(200, 0));
    }
}
