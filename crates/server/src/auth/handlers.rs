//! # Authentication Handlers
//!
//! HTTP request handlers for login, profile, and push-token registration.

use ::auth::password::verify_password;
use ::auth::secrecy::SecretString;
use axum::Json;
use chrono::Utc;
use entity::users::{Column, Entity as UsersEntity};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use validator::Validate;

use crate::{
    dto::auth::{LoginRequest, LoginResponse, PushTokenRequest},
    dto::users::ResidentResponse,
    middleware::auth::AuthenticatedUser,
    AppError,
    AppState,
    Result,
};

/// Inner handler for the login endpoint.
///
/// Verifies the Argon2id hash and issues an HS256 access token carrying the
/// resident's role. Soft-deleted accounts cannot log in.
pub async fn login_handler_inner(state: &AppState, req: LoginRequest) -> Result<Json<LoginResponse>> {
    req.validate().map_err(AppError::from)?;

    let user = UsersEntity::find()
        .filter(Column::Email.eq(req.email.clone()))
        .one(&state.db)
        .await?;

    // Same error for unknown email and bad password.
    let user = user.ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    if user.is_deleted {
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let password = SecretString::from(req.password);
    if verify_password(&password, &user.password_hash).is_err() {
        logging::log_auth_event!("login", user.id, false);
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let token = ::auth::create_access_token(&state.jwt_config, &user.id, &user.email, &user.role.to_string())?;

    logging::log_auth_event!("login", user.id, true);

    Ok(Json(LoginResponse {
        access_token: token,
        expires_in:   state.jwt_config.expiration_seconds,
        token_type:   "Bearer".to_string(),
        user:         user.into(),
    }))
}

/// Inner handler for the profile endpoint.
pub async fn me_handler_inner(state: &AppState, user: &AuthenticatedUser) -> Result<Json<ResidentResponse>> {
    let model = UsersEntity::find_by_id(&user.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(model.into()))
}

/// Inner handler for registering the caller's push-notification token.
pub async fn register_push_token_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    req: PushTokenRequest,
) -> Result<Json<ResidentResponse>> {
    req.validate().map_err(AppError::from)?;

    let model = UsersEntity::find_by_id(&user.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let mut active: entity::users::ActiveModel = model.into();
    active.push_token = Set(Some(req.push_token));
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    Ok(Json(updated.into()))
}
