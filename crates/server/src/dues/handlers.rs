//! # Dues Handlers
//!
//! HTTP request handlers for the dues lifecycle. Generation and recording
//! live in [`crate::dues::engine`]; handlers add authorization, validation,
//! pagination, and notification dispatch.

use ::auth::permissions::DuesAction;
use ::auth::Permission;
use axum::Json;
use base64::Engine as _;
use chrono::Utc;
use entity::dues::{self, DuesStatus, DuesType, Entity as DuesEntity};
use entity::users::Entity as UsersEntity;
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

use crate::dto::dues::{
    DuesListQuery,
    DuesListResponse,
    DuesResponse,
    GenerateCustomRequest,
    GeneratePeriodicRequest,
    GenerateYearlyRequest,
    GenerationSummary,
    ImportSummary,
    PeriodFailure,
    RecordPaymentOutcome,
    RecordPaymentRequest,
    StatusSummaryResponse,
    SubmitProofRequest,
    UpdateDuesStatusRequest,
    YearlyGenerationSummary,
};
use crate::dues::{engine, import};
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::permissions::check_permission;
use crate::period::{self, FIXED_DUES_AMOUNT};
use crate::{notify, AppError, AppState, Result};

/// Inner handler: list dues records.
///
/// Residents without dues-management rights see only their own records; the
/// `user_id` filter is officer-only.
pub async fn list_dues_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    query: DuesListQuery,
) -> Result<Json<DuesListResponse>> {
    let can_read_all = check_permission(user, Permission::Dues(DuesAction::Read)).is_ok();

    let mut select = DuesEntity::find();

    if can_read_all {
        if let Some(ref user_id) = query.user_id {
            select = select.filter(dues::Column::UserId.eq(user_id.clone()));
        }
    }
    else {
        select = select.filter(dues::Column::UserId.eq(user.id.clone()));
    }

    if let Some(ref p) = query.period {
        select = select.filter(dues::Column::Period.eq(p.clone()));
    }
    if let Some(ref s) = query.status {
        let status = DuesStatus::from_string(s)
            .ok_or_else(|| AppError::bad_request(format!("Unknown dues status '{}'", s)))?;
        select = select.filter(dues::Column::Status.eq(status));
    }
    if let Some(ref t) = query.dues_type {
        let dues_type = DuesType::from_string(t)
            .ok_or_else(|| AppError::bad_request(format!("Unknown dues type '{}'", t)))?;
        select = select.filter(dues::Column::DuesType.eq(dues_type));
    }

    let total = select.clone().count(&state.db).await?;
    let pagination = PaginationMeta::new(query.page(), query.per_page(), total);

    let records = select
        .order_by_desc(dues::Column::Period)
        .order_by_asc(dues::Column::CreatedAt)
        .offset(pagination.offset())
        .limit(pagination.limit())
        .all(&state.db)
        .await?;

    Ok(Json(DuesListResponse {
        dues: records.into_iter().map(DuesResponse::from).collect(),
        pagination,
    }))
}

/// Inner handler: fetch one dues record. Owner or dues reader only.
pub async fn get_dues_inner(state: &AppState, user: &AuthenticatedUser, dues_id: &str) -> Result<Json<DuesResponse>> {
    let record = find_record(state, dues_id).await?;

    if record.user_id != user.id {
        check_permission(user, Permission::Dues(DuesAction::Read))?;
    }

    Ok(Json(record.into()))
}

/// Inner handler: generate regular dues for one period and notify residents.
pub async fn generate_periodic_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    req: GeneratePeriodicRequest,
) -> Result<Json<GenerationSummary>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Dues(DuesAction::Generate))?;

    let period = req.period.unwrap_or_else(|| period::current_period(Utc::now()));
    let amount = req.amount.unwrap_or(FIXED_DUES_AMOUNT);
    require_positive(amount)?;

    let summary = engine::generate_periodic(
        &state.db,
        &period,
        amount,
        req.include_inactive.unwrap_or(false),
        req.target_users.as_deref(),
    )
    .await?;

    if summary.created > 0 {
        notify::fan_out_to_residents(state, notify::new_iuran(&period, amount)).await?;
    }

    Ok(Json(summary))
}

/// Inner handler: generate regular dues for all twelve periods of a year.
pub async fn generate_yearly_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    req: GenerateYearlyRequest,
) -> Result<Json<YearlyGenerationSummary>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Dues(DuesAction::Generate))?;

    let amount = req.amount.unwrap_or(FIXED_DUES_AMOUNT);
    require_positive(amount)?;

    let summary = engine::generate_yearly(&state.db, req.year, amount, req.target_users.as_deref()).await?;

    if summary.total_created > 0 {
        notify::fan_out_to_residents(state, notify::new_yearly_iuran(req.year, amount)).await?;
    }

    Ok(Json(summary))
}

/// Inner handler: generate a one-off custom levy.
pub async fn generate_custom_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    req: GenerateCustomRequest,
) -> Result<Json<GenerationSummary>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Dues(DuesAction::Generate))?;
    require_positive(req.amount)?;

    let created = engine::generate_custom(
        &state.db,
        &req.period,
        req.amount,
        &req.description,
        req.target_users.as_deref(),
    )
    .await?;

    if created > 0 {
        notify::fan_out_to_residents(state, notify::custom_iuran(&req.period, req.amount, &req.description)).await?;
    }

    Ok(Json(GenerationSummary {
        period:    req.period,
        created,
        skipped:   0,
        conflicts: Vec::new(),
    }))
}

/// Inner handler: resident submits proof of payment.
///
/// Stores the image, best-effort deletes a previously stored proof, stamps
/// `submitted_at`, and moves the record to `pending`.
pub async fn submit_proof_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    dues_id: &str,
    req: SubmitProofRequest,
) -> Result<Json<DuesResponse>> {
    req.validate().map_err(AppError::from)?;

    let record = find_record(state, dues_id).await?;

    if record.user_id != user.id {
        return Err(AppError::unauthorized("You can only submit proof for your own dues"));
    }

    match record.status {
        DuesStatus::Paid => return Err(AppError::conflict("Dues record is already paid")),
        DuesStatus::Pending => {
            return Err(AppError::conflict("A proof is already awaiting confirmation"));
        },
        DuesStatus::Unpaid | DuesStatus::Rejected => {},
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(req.data.as_bytes())
        .map_err(|_| AppError::bad_request("Image data is not valid base64"))?;

    let reference = state.images.store("proofs", &req.filename, &bytes).await?;

    if let Some(ref old) = record.proof_image {
        if let Err(e) = state.images.delete(old).await {
            logging::warn!(target: "dues", dues_id = %dues_id, error = %e, "Failed to delete replaced proof image");
        }
    }

    let mut active: dues::ActiveModel = record.into();
    active.proof_image = Set(Some(reference));
    active.submitted_at = Set(Some(Utc::now()));
    active.status = Set(DuesStatus::Pending);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    logging::info!(target: "dues", dues_id = %dues_id, user_id = %user.id, "Payment proof submitted");

    Ok(Json(updated.into()))
}

/// Inner handler: officer confirms or rejects a submitted proof.
///
/// Stamps `confirmed_at`/`confirmed_by` and notifies the resident.
pub async fn update_status_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    dues_id: &str,
    req: UpdateDuesStatusRequest,
) -> Result<Json<DuesResponse>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Dues(DuesAction::Confirm))?;

    let new_status = match req.status.as_str() {
        "paid" => DuesStatus::Paid,
        "rejected" => DuesStatus::Rejected,
        other => {
            return Err(AppError::bad_request(format!(
                "Status must be 'paid' or 'rejected', got '{}'",
                other
            )));
        },
    };

    let record = find_record(state, dues_id).await?;
    let owner_id = record.user_id.clone();
    let record_period = record.period.clone();
    let now = Utc::now();

    let mut active: dues::ActiveModel = record.into();
    active.status = Set(new_status);
    active.confirmed_at = Set(Some(now));
    active.confirmed_by = Set(Some(user.id.clone()));
    // An omitted note keeps whatever is already stored.
    if req.note.is_some() {
        active.note = Set(req.note.clone());
    }
    if new_status == DuesStatus::Paid {
        active.paid_at = Set(Some(now));
    }
    active.updated_at = Set(now);
    let updated = active.update(&state.db).await?;

    logging::info!(
        target: "dues",
        dues_id = %dues_id,
        status = %new_status,
        confirmed_by = %user.id,
        "Dues status updated"
    );

    if let Some(owner) = UsersEntity::find_by_id(&owner_id).one(&state.db).await? {
        let payload = notify::iuran_status_update(dues_id, &record_period, &new_status.to_string(), req.note.as_deref());
        notify::dispatch_to_user(state, &owner.id, owner.push_token, payload);
    }

    Ok(Json(updated.into()))
}

/// Inner handler: officer records an offline payment over several periods.
///
/// Per-period accounting; the batch never fails wholesale. Successes plus
/// failures always equal the requested periods.
pub async fn record_payment_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    req: RecordPaymentRequest,
) -> Result<Json<RecordPaymentOutcome>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Dues(DuesAction::Record))?;

    let resident = UsersEntity::find_by_id(&req.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Resident not found"))?;

    let paid_at = req.payment_date.unwrap_or_else(Utc::now);
    let mut outcome = RecordPaymentOutcome {
        paid_periods: Vec::new(),
        failures:     Vec::new(),
        total_paid:   Decimal::ZERO,
    };

    for p in &req.periods {
        if period::parse_period(p).is_err() {
            outcome.failures.push(PeriodFailure {
                period: p.clone(),
                reason: "Invalid period format".to_string(),
            });
            continue;
        }

        let record = DuesEntity::find()
            .filter(dues::Column::UserId.eq(&resident.id))
            .filter(dues::Column::Period.eq(p.clone()))
            .filter(dues::Column::DuesType.eq(DuesType::Regular))
            .filter(dues::Column::Status.eq(DuesStatus::Unpaid))
            .one(&state.db)
            .await?;

        let Some(record) = record else {
            outcome.failures.push(PeriodFailure {
                period: p.clone(),
                reason: "No unpaid dues record for this period".to_string(),
            });
            continue;
        };

        let amount = record.amount;
        let mut active: dues::ActiveModel = record.into();
        active.status = Set(DuesStatus::Paid);
        active.paid_at = Set(Some(paid_at));
        active.recorded_by = Set(Some(user.id.clone()));
        if req.payment_method.is_some() {
            active.payment_method = Set(req.payment_method.clone());
        }
        if req.note.is_some() {
            active.note = Set(req.note.clone());
        }
        active.updated_at = Set(Utc::now());
        active.update(&state.db).await?;

        outcome.total_paid += amount;
        outcome.paid_periods.push(p.clone());
    }

    logging::info!(
        target: "dues",
        user_id = %resident.id,
        recorded_by = %user.id,
        paid = outcome.paid_periods.len(),
        failed = outcome.failures.len(),
        "Bulk payment recorded"
    );

    if !outcome.paid_periods.is_empty() {
        let payload = notify::payment_recorded(&outcome.paid_periods, outcome.total_paid);
        notify::dispatch_to_user(state, &resident.id, resident.push_token, payload);
    }

    Ok(Json(outcome))
}

/// Inner handler: zero-filled per-status counts for one period.
pub async fn status_summary_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    period: &str,
) -> Result<Json<StatusSummaryResponse>> {
    check_permission(user, Permission::Dues(DuesAction::Read))?;
    crate::period::parse_period(period)?;

    let statuses: Vec<DuesStatus> = DuesEntity::find()
        .filter(dues::Column::Period.eq(period))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|r| r.status)
        .collect();

    Ok(Json(engine::summarize_statuses(period, &statuses)))
}

/// Inner handler: import a dues sheet (CSV), destructive rebuild per resident.
pub async fn import_sheet_inner(state: &AppState, user: &AuthenticatedUser, csv_body: String) -> Result<Json<ImportSummary>> {
    check_permission(user, Permission::Dues(DuesAction::Import))?;
    let summary = import::import_sheet(&state.db, &csv_body).await?;
    Ok(Json(summary))
}

/// Inner handler: export the dues sheet (CSV) for a year.
pub async fn export_sheet_inner(state: &AppState, user: &AuthenticatedUser, year: i32) -> Result<String> {
    check_permission(user, Permission::Dues(DuesAction::Export))?;
    crate::dues::export::export_sheet(&state.db, year).await
}

async fn find_record(state: &AppState, dues_id: &str) -> Result<dues::Model> {
    DuesEntity::find_by_id(dues_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Dues record not found"))
}

fn require_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(AppError::bad_request("Amount must be positive"));
    }
    Ok(())
}
