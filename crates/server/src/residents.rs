//! # Resident Handlers
//!
//! HTTP request handlers for resident management. Registration and
//! restoration both back-fill dues records through December of the current
//! year, so a resident joining mid-year immediately owes the remaining
//! months.

use ::auth::password::{hash_password, validate_password_strength};
use ::auth::permissions::ResidentAction;
use ::auth::secrecy::{ExposeSecret, SecretString};
use ::auth::Permission;
use axum::Json;
use chrono::Utc;
use entity::dues::{self, DuesStatus, Entity as DuesEntity};
use entity::users::{self, Entity as UsersEntity, Role, UserStatus};
use error::PaginationMeta;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    Condition,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
};
use validator::Validate;

use crate::dto::users::{
    RegisterResidentRequest,
    ResidentListQuery,
    ResidentListResponse,
    ResidentResponse,
    UpdateResidentRequest,
    UpdateResidentStatusRequest,
};
use crate::dues::backfill_for_resident;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::permissions::check_permission;
use crate::utils::escape_like_wildcards;
use crate::{AppError, AppState, Result};

/// Inner handler: register a new resident.
///
/// Creates the account and back-fills unpaid dues from the current month
/// through December. The admin role never receives dues records.
pub async fn register_resident_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    req: RegisterResidentRequest,
) -> Result<Json<ResidentResponse>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Residents(ResidentAction::Create))?;

    let role = match req.role.as_deref() {
        None => Role::Warga,
        Some(r) => Role::from_string(r).ok_or_else(|| AppError::bad_request(format!("Unknown role '{}'", r)))?,
    };

    if let Err(errors) = validate_password_strength(&req.password) {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(AppError::bad_request(format!("Weak password: {}", messages.join(", "))));
    }

    let clash = UsersEntity::find()
        .filter(
            Condition::any()
                .add(users::Column::Email.eq(req.email.clone()))
                .add(users::Column::Username.eq(req.username.clone())),
        )
        .one(&state.db)
        .await?;
    if clash.is_some() {
        return Err(AppError::conflict("Email or username is already taken"));
    }

    let password_hash = hash_password(&SecretString::from(req.password), None)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let now = Utc::now();
    let created = users::ActiveModel {
        id:            Set(entity::new_id("usr")),
        email:         Set(req.email),
        username:      Set(req.username),
        full_name:     Set(req.full_name),
        password_hash: Set(password_hash.expose_secret().to_string()),
        role:          Set(role),
        address:       Set(req.address),
        phone:         Set(req.phone),
        position:      Set(req.position),
        status:        Set(UserStatus::Active),
        is_deleted:    Set(false),
        deleted_at:    Set(None),
        push_token:    Set(None),
        created_at:    Set(now),
        updated_at:    Set(now),
    }
    .insert(&state.db)
    .await?;

    if created.role != Role::Admin {
        backfill_for_resident(&state.db, &created.id, now).await?;
    }

    logging::info!(target: "residents", user_id = %created.id, role = %created.role, "Resident registered");

    Ok(Json(created.into()))
}

/// Inner handler: paginated resident list with search and filters.
pub async fn list_residents_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    query: ResidentListQuery,
) -> Result<Json<ResidentListResponse>> {
    check_permission(user, Permission::Residents(ResidentAction::Read))?;

    let mut select = UsersEntity::find();

    if !query.include_deleted.unwrap_or(false) {
        select = select.filter(users::Column::IsDeleted.eq(false));
    }

    if let Some(ref s) = query.status {
        let status = UserStatus::from_string(s)
            .ok_or_else(|| AppError::bad_request(format!("Unknown status '{}'", s)))?;
        select = select.filter(users::Column::Status.eq(status));
    }

    if let Some(ref r) = query.role {
        let role = Role::from_string(r).ok_or_else(|| AppError::bad_request(format!("Unknown role '{}'", r)))?;
        select = select.filter(users::Column::Role.eq(role));
    }

    if let Some(ref term) = query.search {
        let pattern = format!("%{}%", escape_like_wildcards(term.trim()));
        select = select.filter(
            Condition::any()
                .add(users::Column::FullName.like(pattern.clone()))
                .add(users::Column::Username.like(pattern.clone()))
                .add(users::Column::Email.like(pattern.clone()))
                .add(users::Column::Address.like(pattern)),
        );
    }

    let total = select.clone().count(&state.db).await?;
    let pagination = PaginationMeta::new(query.page(), query.per_page(), total);

    let residents = select
        .order_by_asc(users::Column::FullName)
        .offset(pagination.offset())
        .limit(pagination.limit())
        .all(&state.db)
        .await?;

    Ok(Json(ResidentListResponse {
        residents: residents.into_iter().map(ResidentResponse::from).collect(),
        pagination,
    }))
}

/// Inner handler: fetch one resident. Readable by any resident reader, or
/// by the resident themself.
pub async fn get_resident_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    resident_id: &str,
) -> Result<Json<ResidentResponse>> {
    if user.id != resident_id {
        check_permission(user, Permission::Residents(ResidentAction::Read))?;
    }

    let resident = find_resident(state, resident_id).await?;
    Ok(Json(resident.into()))
}

/// Inner handler: update a resident profile.
pub async fn update_resident_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    resident_id: &str,
    req: UpdateResidentRequest,
) -> Result<Json<ResidentResponse>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Residents(ResidentAction::Update))?;

    let resident = find_resident(state, resident_id).await?;

    let new_role = match req.role.as_deref() {
        None => None,
        Some(r) => Some(Role::from_string(r).ok_or_else(|| AppError::bad_request(format!("Unknown role '{}'", r)))?),
    };

    if let Some(ref email) = req.email {
        let clash = UsersEntity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .filter(users::Column::Id.ne(resident_id))
            .one(&state.db)
            .await?;
        if clash.is_some() {
            return Err(AppError::conflict("Email is already taken"));
        }
    }

    let mut active: users::ActiveModel = resident.into();
    if let Some(full_name) = req.full_name {
        active.full_name = Set(full_name);
    }
    if let Some(email) = req.email {
        active.email = Set(email);
    }
    if let Some(role) = new_role {
        active.role = Set(role);
    }
    if req.address.is_some() {
        active.address = Set(req.address);
    }
    if req.phone.is_some() {
        active.phone = Set(req.phone);
    }
    if req.position.is_some() {
        active.position = Set(req.position);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    logging::info!(target: "residents", user_id = %resident_id, updated_by = %user.id, "Resident updated");

    Ok(Json(updated.into()))
}

/// Inner handler: change a resident's residency status.
pub async fn update_resident_status_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    resident_id: &str,
    req: UpdateResidentStatusRequest,
) -> Result<Json<ResidentResponse>> {
    req.validate().map_err(AppError::from)?;
    check_permission(user, Permission::Residents(ResidentAction::Update))?;

    let status = UserStatus::from_string(&req.status)
        .ok_or_else(|| AppError::bad_request(format!("Unknown status '{}'", req.status)))?;

    let resident = find_resident(state, resident_id).await?;
    let mut active: users::ActiveModel = resident.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    Ok(Json(updated.into()))
}

/// Inner handler: soft-delete a resident.
///
/// The row stays and paid dues history survives, but the resident's unpaid
/// records are hard-deleted so a departed resident never shows up in
/// summaries or reminders. Restoration back-fills the gap.
pub async fn delete_resident_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    resident_id: &str,
) -> Result<Json<ResidentResponse>> {
    check_permission(user, Permission::Residents(ResidentAction::Delete))?;

    let resident = find_resident(state, resident_id).await?;
    if resident.is_deleted {
        return Err(AppError::conflict("Resident is already deleted"));
    }

    let mut active: users::ActiveModel = resident.into();
    active.is_deleted = Set(true);
    active.deleted_at = Set(Some(Utc::now()));
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    let purged = DuesEntity::delete_many()
        .filter(dues::Column::UserId.eq(resident_id))
        .filter(dues::Column::Status.eq(DuesStatus::Unpaid))
        .exec(&state.db)
        .await?;
    if purged.rows_affected > 0 {
        logging::info!(
            target: "residents",
            user_id = %resident_id,
            removed = purged.rows_affected,
            "Unpaid dues removed with resident deletion"
        );
    }

    logging::info!(target: "residents", user_id = %resident_id, deleted_by = %user.id, "Resident soft-deleted");

    Ok(Json(updated.into()))
}

/// Inner handler: restore a soft-deleted resident.
///
/// Symmetric to registration: back-fills dues from the restoration month
/// through December, filling only the gap left by the deletion window.
pub async fn restore_resident_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    resident_id: &str,
) -> Result<Json<ResidentResponse>> {
    check_permission(user, Permission::Residents(ResidentAction::Restore))?;

    let resident = find_resident(state, resident_id).await?;
    if !resident.is_deleted {
        return Err(AppError::conflict("Resident is not deleted"));
    }

    let now = Utc::now();
    let role = resident.role;
    let mut active: users::ActiveModel = resident.into();
    active.is_deleted = Set(false);
    active.deleted_at = Set(None);
    active.updated_at = Set(now);
    let updated = active.update(&state.db).await?;

    if role != Role::Admin {
        backfill_for_resident(&state.db, resident_id, now).await?;
    }

    logging::info!(target: "residents", user_id = %resident_id, restored_by = %user.id, "Resident restored");

    Ok(Json(updated.into()))
}

async fn find_resident(state: &AppState, resident_id: &str) -> Result<users::Model> {
    UsersEntity::find_by_id(resident_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Resident not found"))
}
