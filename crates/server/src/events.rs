//! # Event Handlers
//!
//! Community events and their donation/expense sub-ledgers. Totals are
//! recomputed from the rows on every mutating save; the first ledger entry
//! moves an event from planning to active. Completing an event freezes the
//! ledger for everyone but the administrator and forks each expense row into
//! the general expense ledger.

use ::auth::permissions::EventAction;
use ::auth::Permission;
use axum::Json;
use chrono::Utc;
use entity::event_donations::{self, Entity as DonationsEntity};
use entity::event_expenses::{self, Entity as EventExpensesEntity};
use entity::events::{self, Entity as EventsEntity, EventStatus};
use entity::users::Role;
use entity::{expense_items, expenses};
use error::PaginationMeta;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
};
use validator::Validate;

use crate::dto::events::{
    AddDonationRequest,
    AddEventExpenseRequest,
    CompleteEventResponse,
    CreateEventRequest,
    DonationResponse,
    EventDetailResponse,
    EventExpenseResponse,
    EventListQuery,
    EventListResponse,
    EventResponse,
    UpdateEventRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::permissions::check_permission;
use crate::utils::slugify;
use crate::{AppError, AppState, Result};

/// Inner handler: create an event in planning state.
pub async fn create_event_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    req: CreateEventRequest,
) -> Result<Json<EventResponse>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Events(EventAction::Create))?;

    let slug = unique_event_slug(state, &req.name, None).await?;
    let now = Utc::now();
    let event = events::ActiveModel {
        id:              Set(entity::new_id("evt")),
        name:            Set(req.name),
        slug:            Set(slug),
        description:     Set(req.description),
        event_date:      Set(req.event_date),
        total_donations: Set(Decimal::ZERO),
        total_expenses:  Set(Decimal::ZERO),
        balance:         Set(Decimal::ZERO),
        status:          Set(EventStatus::Planning),
        completed_at:    Set(None),
        created_by:      Set(user.id.clone()),
        created_at:      Set(now),
        updated_at:      Set(now),
    }
    .insert(&state.db)
    .await?;

    logging::info!(target: "events", event_id = %event.id, created_by = %user.id, "Event created");

    Ok(Json(event.into()))
}

/// Inner handler: paginated event list.
pub async fn list_events_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    query: EventListQuery,
) -> Result<Json<EventListResponse>> {
    check_permission(user, Permission::Events(EventAction::Read))?;

    let mut select = EventsEntity::find();
    if let Some(ref s) = query.status {
        let status = EventStatus::from_string(s)
            .ok_or_else(|| AppError::bad_request(format!("Unknown event status '{}'", s)))?;
        select = select.filter(events::Column::Status.eq(status));
    }

    let total = select.clone().count(&state.db).await?;
    let pagination = PaginationMeta::new(query.page(), query.per_page(), total);

    let records = select
        .order_by_desc(events::Column::EventDate)
        .offset(pagination.offset())
        .limit(pagination.limit())
        .all(&state.db)
        .await?;

    Ok(Json(EventListResponse {
        events: records.into_iter().map(EventResponse::from).collect(),
        pagination,
    }))
}

/// Inner handler: event detail with both ledgers.
pub async fn get_event_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    event_id: &str,
) -> Result<Json<EventDetailResponse>> {
    check_permission(user, Permission::Events(EventAction::Read))?;

    let event = find_event(state, event_id).await?;
    let (donations, expenses) = load_ledger(state, event_id).await?;

    Ok(Json(EventDetailResponse {
        event:     event.into(),
        donations: donations.into_iter().map(DonationResponse::from).collect(),
        expenses:  expenses.into_iter().map(EventExpenseResponse::from).collect(),
    }))
}

/// Inner handler: update event metadata.
pub async fn update_event_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    event_id: &str,
    req: UpdateEventRequest,
) -> Result<Json<EventResponse>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Events(EventAction::Update))?;

    let event = find_event(state, event_id).await?;
    guard_completed(&event, user)?;

    let mut active: events::ActiveModel = event.into();
    if let Some(name) = req.name {
        active.slug = Set(unique_event_slug(state, &name, Some(event_id)).await?);
        active.name = Set(name);
    }
    if req.description.is_some() {
        active.description = Set(req.description);
    }
    if let Some(date) = req.event_date {
        active.event_date = Set(date);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    Ok(Json(updated.into()))
}

/// Inner handler: delete an event and its ledgers.
pub async fn delete_event_inner(state: &AppState, user: &AuthenticatedUser, event_id: &str) -> Result<()> {
    check_permission(user, Permission::Events(EventAction::Delete))?;

    let event = find_event(state, event_id).await?;
    guard_completed(&event, user)?;

    DonationsEntity::delete_many()
        .filter(event_donations::Column::EventId.eq(event_id))
        .exec(&state.db)
        .await?;
    EventExpensesEntity::delete_many()
        .filter(event_expenses::Column::EventId.eq(event_id))
        .exec(&state.db)
        .await?;
    EventsEntity::delete_by_id(event_id).exec(&state.db).await?;

    logging::info!(target: "events", event_id = %event_id, deleted_by = %user.id, "Event deleted");

    Ok(())
}

/// Inner handler: add a donation row and recompute totals.
pub async fn add_donation_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    event_id: &str,
    req: AddDonationRequest,
) -> Result<Json<EventDetailResponse>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Events(EventAction::Ledger))?;

    let event = find_event(state, event_id).await?;
    guard_completed(&event, user)?;
    if req.amount <= Decimal::ZERO {
        return Err(AppError::bad_request("Donation amount must be positive"));
    }

    event_donations::ActiveModel {
        id:         Set(entity::new_id("don")),
        event_id:   Set(event_id.to_string()),
        donor_name: Set(req.donor_name),
        amount:     Set(req.amount),
        donated_at: Set(req.donated_at.unwrap_or_else(|| Utc::now().date_naive())),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    let event = recompute_totals(state, event).await?;
    let (donations, expenses) = load_ledger(state, event_id).await?;

    Ok(Json(EventDetailResponse {
        event:     event.into(),
        donations: donations.into_iter().map(DonationResponse::from).collect(),
        expenses:  expenses.into_iter().map(EventExpenseResponse::from).collect(),
    }))
}

/// Inner handler: add an expense row and recompute totals.
pub async fn add_event_expense_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    event_id: &str,
    req: AddEventExpenseRequest,
) -> Result<Json<EventDetailResponse>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Events(EventAction::Ledger))?;

    let event = find_event(state, event_id).await?;
    guard_completed(&event, user)?;
    if req.amount <= Decimal::ZERO {
        return Err(AppError::bad_request("Expense amount must be positive"));
    }

    let proof_images = serde_json::to_value(req.proof_images.unwrap_or_default())
        .map_err(|e| AppError::internal(format!("Failed to encode proof images: {}", e)))?;

    event_expenses::ActiveModel {
        id:           Set(entity::new_id("eex")),
        event_id:     Set(event_id.to_string()),
        description:  Set(req.description),
        amount:       Set(req.amount),
        spent_at:     Set(req.spent_at.unwrap_or_else(|| Utc::now().date_naive())),
        category:     Set(req.category),
        proof_images: Set(proof_images),
        created_at:   Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    let event = recompute_totals(state, event).await?;
    let (donations, expenses) = load_ledger(state, event_id).await?;

    Ok(Json(EventDetailResponse {
        event:     event.into(),
        donations: donations.into_iter().map(DonationResponse::from).collect(),
        expenses:  expenses.into_iter().map(EventExpenseResponse::from).collect(),
    }))
}

/// Inner handler: complete an event.
///
/// Conflict when already completed. Each expense row is forked into a
/// standalone record in the general expense ledger, titled
/// "{event name} - {expense description}".
pub async fn complete_event_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    event_id: &str,
) -> Result<Json<CompleteEventResponse>> {
    check_permission(user, Permission::Events(EventAction::Complete))?;

    let event = find_event(state, event_id).await?;
    if event.status == EventStatus::Completed {
        return Err(AppError::conflict("Event is already completed"));
    }

    let (_, ledger_expenses) = load_ledger(state, event_id).await?;

    let now = Utc::now();
    let mut expenses_created = 0;
    for row in &ledger_expenses {
        let title = format!("{} - {}", event.name, row.description);
        let slug = crate::expenses::unique_slug(state, &title, None).await?;

        let forked = expenses::ActiveModel {
            id:         Set(entity::new_id("exp")),
            title:      Set(title),
            slug:       Set(slug),
            total:      Set(row.amount),
            created_by: Set(user.id.clone()),
            event_id:   Set(Some(event_id.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&state.db)
        .await?;

        expense_items::ActiveModel {
            id:         Set(entity::new_id("itm")),
            expense_id: Set(forked.id),
            name:       Set(row.description.clone()),
            price:      Set(row.amount),
            image:      Set(None),
            created_at: Set(now),
        }
        .insert(&state.db)
        .await?;

        expenses_created += 1;
    }

    let narrative = completion_narrative(&event.name, event.total_donations, event.total_expenses);

    let mut active: events::ActiveModel = event.into();
    active.status = Set(EventStatus::Completed);
    active.completed_at = Set(Some(now));
    active.updated_at = Set(now);
    let completed = active.update(&state.db).await?;

    logging::info!(
        target: "events",
        event_id = %event_id,
        expenses_created,
        completed_by = %user.id,
        "Event completed"
    );

    Ok(Json(CompleteEventResponse {
        event: completed.into(),
        expenses_created,
        narrative,
    }))
}

/// Inner handler: read-only CSV report of an event's ledger.
pub async fn event_report_inner(state: &AppState, user: &AuthenticatedUser, event_id: &str) -> Result<String> {
    check_permission(user, Permission::Events(EventAction::Read))?;

    let event = find_event(state, event_id).await?;
    let (donations, expenses) = load_ledger(state, event_id).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    let write_err = |e: csv::Error| AppError::internal(format!("CSV write failed: {}", e));

    writer
        .write_record(["Jenis", "Keterangan", "Tanggal", "Jumlah"])
        .map_err(write_err)?;
    for d in &donations {
        writer
            .write_record(["donasi", &d.donor_name, &d.donated_at.to_string(), &d.amount.to_string()])
            .map_err(write_err)?;
    }
    for e in &expenses {
        writer
            .write_record(["pengeluaran", &e.description, &e.spent_at.to_string(), &e.amount.to_string()])
            .map_err(write_err)?;
    }
    writer
        .write_record(["saldo", &event.name, "", &event.balance.to_string()])
        .map_err(write_err)?;

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV write failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::internal(format!("CSV output was not UTF-8: {}", e)))
}

/// Surplus/deficit/balanced summary for a completed event. Pure.
pub fn completion_narrative(name: &str, donations: Decimal, expenses: Decimal) -> String {
    let balance = donations - expenses;
    if balance > Decimal::ZERO {
        format!(
            "Acara '{}' selesai dengan surplus Rp{}: donasi Rp{} melebihi pengeluaran Rp{}",
            name, balance, donations, expenses
        )
    }
    else if balance < Decimal::ZERO {
        format!(
            "Acara '{}' selesai dengan defisit Rp{}: pengeluaran Rp{} melebihi donasi Rp{}",
            name, -balance, expenses, donations
        )
    }
    else {
        format!(
            "Acara '{}' selesai impas: donasi dan pengeluaran sama-sama Rp{}",
            name, donations
        )
    }
}

/// Completed events are frozen for everyone but the administrator.
fn guard_completed(event: &events::Model, user: &AuthenticatedUser) -> Result<()> {
    if event.status == EventStatus::Completed && user.role != Role::Admin {
        return Err(AppError::forbidden("Completed events can only be changed by an administrator"));
    }
    Ok(())
}

/// Recompute the derived total columns from the ledger rows; the first entry
/// moves a planning event to active.
async fn recompute_totals(state: &AppState, event: events::Model) -> Result<events::Model> {
    let (donations, expenses) = load_ledger(state, &event.id).await?;

    let total_donations: Decimal = donations.iter().map(|d| d.amount).sum();
    let total_expenses: Decimal = expenses.iter().map(|e| e.amount).sum();
    let has_entries = !donations.is_empty() || !expenses.is_empty();
    let status = event.status;

    let mut active: events::ActiveModel = event.into();
    active.total_donations = Set(total_donations);
    active.total_expenses = Set(total_expenses);
    active.balance = Set(total_donations - total_expenses);
    if status == EventStatus::Planning && has_entries {
        active.status = Set(EventStatus::Active);
    }
    active.updated_at = Set(Utc::now());
    Ok(active.update(&state.db).await?)
}

async fn load_ledger(
    state: &AppState,
    event_id: &str,
) -> Result<(Vec<event_donations::Model>, Vec<event_expenses::Model>)> {
    let donations = DonationsEntity::find()
        .filter(event_donations::Column::EventId.eq(event_id))
        .order_by_asc(event_donations::Column::DonatedAt)
        .all(&state.db)
        .await?;
    let expenses = EventExpensesEntity::find()
        .filter(event_expenses::Column::EventId.eq(event_id))
        .order_by_asc(event_expenses::Column::SpentAt)
        .all(&state.db)
        .await?;
    Ok((donations, expenses))
}

async fn find_event(state: &AppState, event_id: &str) -> Result<events::Model> {
    EventsEntity::find_by_id(event_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))
}

/// Derive a slug unique among events, appending a counter on clashes.
async fn unique_event_slug(state: &AppState, name: &str, exclude_id: Option<&str>) -> Result<String> {
    let base = {
        let slug = slugify(name);
        if slug.is_empty() { "acara".to_string() } else { slug }
    };

    let mut candidate = base.clone();
    let mut counter = 1;
    loop {
        let mut query = EventsEntity::find().filter(events::Column::Slug.eq(candidate.clone()));
        if let Some(id) = exclude_id {
            query = query.filter(events::Column::Id.ne(id));
        }
        if query.one(&state.db).await?.is_none() {
            return Ok(candidate);
        }
        counter += 1;
        candidate = format!("{}-{}", base, counter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrative_surplus() {
        let text = completion_narrative("Agustusan", Decimal::new(500_000, 0), Decimal::new(200_000, 0));
        assert!(text.contains("surplus"));
        assert!(text.contains("300000"));
    }

    #[test]
    fn test_narrative_deficit() {
        let text = completion_narrative("Kerja Bakti", Decimal::new(100_000, 0), Decimal::new(150_000, 0));
        assert!(text.contains("defisit"));
        assert!(text.contains("50000"));
    }

    #[test]
    fn test_narrative_balanced() {
        let text = completion_narrative("Pengajian", Decimal::new(75_000, 0), Decimal::new(75_000, 0));
        assert!(text.contains("impas"));
    }
}
