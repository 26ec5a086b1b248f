//! # API Router Configuration
//!
//! Route table and thin wrapper handlers. Wrappers only run extractors and
//! delegate to the `*_inner` functions, which take `&AppState` directly and
//! are the unit-testable surface.

use axum::{
    extract::{Extension, Path, Query, State as AxumState},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json,
    Router,
};
use error::Result;
use serde::Serialize;

use crate::middleware::auth::AuthenticatedUser;
use crate::AppState;

/// Creates the API router with all routes
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/auth/me", get(me_handler))
        .route("/api/auth/push-token", post(push_token_handler))
        .route("/api/users", post(register_resident_handler).get(list_residents_handler))
        .route(
            "/api/users/:id",
            get(get_resident_handler)
                .put(update_resident_handler)
                .delete(delete_resident_handler),
        )
        .route("/api/users/:id/status", patch(update_resident_status_handler))
        .route("/api/users/:id/restore", post(restore_resident_handler))
        .route("/api/iuran", get(list_dues_handler))
        .route("/api/iuran/generate", post(generate_periodic_handler))
        .route("/api/iuran/generate-yearly", post(generate_yearly_handler))
        .route("/api/iuran/generate-custom", post(generate_custom_handler))
        .route("/api/iuran/record-payment", post(record_payment_handler))
        .route("/api/iuran/summary/:period", get(status_summary_handler))
        .route("/api/iuran/import", post(import_sheet_handler))
        .route("/api/iuran/export/:year", get(export_sheet_handler))
        .route("/api/iuran/:id", get(get_dues_handler))
        .route("/api/iuran/:id/proof", post(submit_proof_handler))
        .route("/api/iuran/:id/status", patch(update_dues_status_handler))
        .route("/api/pengeluaran", post(create_expense_handler).get(list_expenses_handler))
        .route(
            "/api/pengeluaran/:id",
            get(get_expense_handler)
                .put(update_expense_handler)
                .delete(delete_expense_handler),
        )
        .route("/api/events", post(create_event_handler).get(list_events_handler))
        .route(
            "/api/events/:id",
            get(get_event_handler).put(update_event_handler).delete(delete_event_handler),
        )
        .route("/api/events/:id/donations", post(add_donation_handler))
        .route("/api/events/:id/expenses", post(add_event_expense_handler))
        .route("/api/events/:id/complete", post(complete_event_handler))
        .route("/api/events/:id/report", get(event_report_handler))
        .route("/api/inventory", post(create_inventory_handler).get(list_inventory_handler))
        .route(
            "/api/inventory/:id",
            get(get_inventory_handler)
                .put(update_inventory_handler)
                .delete(delete_inventory_handler),
        )
        .route("/api/settings", get(list_settings_handler))
        .route("/api/settings/:key", get(get_setting_handler).put(update_setting_handler))
        .route("/api/balance", get(balance_report_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::auth_middleware,
        ));

    let public_routes = Router::new().route("/api/auth/login", post(login_handler));

    public_routes.merge(protected_routes).with_state(state)
}

/// Health check payload
#[derive(Serialize)]
struct HealthResponse {
    status:         &'static str,
    uptime_seconds: u64,
}

async fn health_handler(AxumState(state): AxumState<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status:         "ok",
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// Creates the health check router
pub fn create_health_router(state: AppState) -> Router {
    Router::new().route("/health", get(health_handler)).with_state(state)
}

/// Creates the main application router
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .merge(create_health_router(state.clone()))
        .merge(create_router(state))
        .layer(middleware::from_fn(
            crate::middleware::request_id::request_id_middleware,
        ))
}

// --- auth ---

async fn login_handler(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<crate::dto::auth::LoginRequest>,
) -> Result<Json<crate::dto::auth::LoginResponse>> {
    crate::auth::handlers::login_handler_inner(&state, req).await
}

async fn me_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<crate::dto::users::ResidentResponse>> {
    crate::auth::handlers::me_handler_inner(&state, &user).await
}

async fn push_token_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<crate::dto::auth::PushTokenRequest>,
) -> Result<Json<crate::dto::users::ResidentResponse>> {
    crate::auth::handlers::register_push_token_inner(&state, &user, req).await
}

// --- residents ---

async fn register_resident_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<crate::dto::users::RegisterResidentRequest>,
) -> Result<Json<crate::dto::users::ResidentResponse>> {
    crate::residents::register_resident_inner(&state, &user, req).await
}

async fn list_residents_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<crate::dto::users::ResidentListQuery>,
) -> Result<Json<crate::dto::users::ResidentListResponse>> {
    crate::residents::list_residents_inner(&state, &user, query).await
}

async fn get_resident_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<crate::dto::users::ResidentResponse>> {
    crate::residents::get_resident_inner(&state, &user, &id).await
}

async fn update_resident_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(req): Json<crate::dto::users::UpdateResidentRequest>,
) -> Result<Json<crate::dto::users::ResidentResponse>> {
    crate::residents::update_resident_inner(&state, &user, &id, req).await
}

async fn update_resident_status_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(req): Json<crate::dto::users::UpdateResidentStatusRequest>,
) -> Result<Json<crate::dto::users::ResidentResponse>> {
    crate::residents::update_resident_status_inner(&state, &user, &id, req).await
}

async fn delete_resident_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<crate::dto::users::ResidentResponse>> {
    crate::residents::delete_resident_inner(&state, &user, &id).await
}

async fn restore_resident_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<crate::dto::users::ResidentResponse>> {
    crate::residents::restore_resident_inner(&state, &user, &id).await
}

// --- dues ---

async fn list_dues_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<crate::dto::dues::DuesListQuery>,
) -> Result<Json<crate::dto::dues::DuesListResponse>> {
    crate::dues::handlers::list_dues_inner(&state, &user, query).await
}

async fn get_dues_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<crate::dto::dues::DuesResponse>> {
    crate::dues::handlers::get_dues_inner(&state, &user, &id).await
}

async fn generate_periodic_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<crate::dto::dues::GeneratePeriodicRequest>,
) -> Result<Json<crate::dto::dues::GenerationSummary>> {
    crate::dues::handlers::generate_periodic_inner(&state, &user, req).await
}

async fn generate_yearly_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<crate::dto::dues::GenerateYearlyRequest>,
) -> Result<Json<crate::dto::dues::YearlyGenerationSummary>> {
    crate::dues::handlers::generate_yearly_inner(&state, &user, req).await
}

async fn generate_custom_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<crate::dto::dues::GenerateCustomRequest>,
) -> Result<Json<crate::dto::dues::GenerationSummary>> {
    crate::dues::handlers::generate_custom_inner(&state, &user, req).await
}

async fn record_payment_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<crate::dto::dues::RecordPaymentRequest>,
) -> Result<Json<crate::dto::dues::RecordPaymentOutcome>> {
    crate::dues::handlers::record_payment_inner(&state, &user, req).await
}

async fn status_summary_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(period): Path<String>,
) -> Result<Json<crate::dto::dues::StatusSummaryResponse>> {
    crate::dues::handlers::status_summary_inner(&state, &user, &period).await
}

async fn submit_proof_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(req): Json<crate::dto::dues::SubmitProofRequest>,
) -> Result<Json<crate::dto::dues::DuesResponse>> {
    crate::dues::handlers::submit_proof_inner(&state, &user, &id, req).await
}

async fn update_dues_status_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(req): Json<crate::dto::dues::UpdateDuesStatusRequest>,
) -> Result<Json<crate::dto::dues::DuesResponse>> {
    crate::dues::handlers::update_status_inner(&state, &user, &id, req).await
}

async fn import_sheet_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: String,
) -> Result<Json<crate::dto::dues::ImportSummary>> {
    crate::dues::handlers::import_sheet_inner(&state, &user, body).await
}

async fn export_sheet_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(year): Path<i32>,
) -> Result<Response> {
    let csv = crate::dues::handlers::export_sheet_inner(&state, &user, year).await?;
    Ok(csv_response(csv))
}

// --- expenses ---

async fn create_expense_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<crate::dto::expenses::CreateExpenseRequest>,
) -> Result<Json<crate::dto::expenses::ExpenseResponse>> {
    crate::expenses::create_expense_inner(&state, &user, req).await
}

async fn list_expenses_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<crate::dto::expenses::ExpenseListQuery>,
) -> Result<Json<crate::dto::expenses::ExpenseListResponse>> {
    crate::expenses::list_expenses_inner(&state, &user, query).await
}

async fn get_expense_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<crate::dto::expenses::ExpenseResponse>> {
    crate::expenses::get_expense_inner(&state, &user, &id).await
}

async fn update_expense_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(req): Json<crate::dto::expenses::UpdateExpenseRequest>,
) -> Result<Json<crate::dto::expenses::ExpenseResponse>> {
    crate::expenses::update_expense_inner(&state, &user, &id, req).await
}

async fn delete_expense_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    crate::expenses::delete_expense_inner(&state, &user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- events ---

async fn create_event_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<crate::dto::events::CreateEventRequest>,
) -> Result<Json<crate::dto::events::EventResponse>> {
    crate::events::create_event_inner(&state, &user, req).await
}

async fn list_events_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<crate::dto::events::EventListQuery>,
) -> Result<Json<crate::dto::events::EventListResponse>> {
    crate::events::list_events_inner(&state, &user, query).await
}

async fn get_event_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<crate::dto::events::EventDetailResponse>> {
    crate::events::get_event_inner(&state, &user, &id).await
}

async fn update_event_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(req): Json<crate::dto::events::UpdateEventRequest>,
) -> Result<Json<crate::dto::events::EventResponse>> {
    crate::events::update_event_inner(&state, &user, &id, req).await
}

async fn delete_event_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    crate::events::delete_event_inner(&state, &user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_donation_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(req): Json<crate::dto::events::AddDonationRequest>,
) -> Result<Json<crate::dto::events::EventDetailResponse>> {
    crate::events::add_donation_inner(&state, &user, &id, req).await
}

async fn add_event_expense_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(req): Json<crate::dto::events::AddEventExpenseRequest>,
) -> Result<Json<crate::dto::events::EventDetailResponse>> {
    crate::events::add_event_expense_inner(&state, &user, &id, req).await
}

async fn complete_event_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<crate::dto::events::CompleteEventResponse>> {
    crate::events::complete_event_inner(&state, &user, &id).await
}

async fn event_report_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Response> {
    let csv = crate::events::event_report_inner(&state, &user, &id).await?;
    Ok(csv_response(csv))
}

// --- inventory ---

async fn create_inventory_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<crate::inventory::CreateInventoryItemRequest>,
) -> Result<Json<crate::inventory::InventoryItemResponse>> {
    crate::inventory::create_item_inner(&state, &user, req).await
}

async fn list_inventory_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<crate::inventory::InventoryListQuery>,
) -> Result<Json<crate::inventory::InventoryListResponse>> {
    crate::inventory::list_items_inner(&state, &user, query).await
}

async fn get_inventory_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<crate::inventory::InventoryItemResponse>> {
    crate::inventory::get_item_inner(&state, &user, &id).await
}

async fn update_inventory_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(req): Json<crate::inventory::UpdateInventoryItemRequest>,
) -> Result<Json<crate::inventory::InventoryItemResponse>> {
    crate::inventory::update_item_inner(&state, &user, &id, req).await
}

async fn delete_inventory_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    crate::inventory::delete_item_inner(&state, &user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- settings & balance ---

async fn list_settings_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<crate::settings::SettingResponse>>> {
    crate::settings::list_settings_inner(&state, &user).await
}

async fn get_setting_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(key): Path<String>,
) -> Result<Json<crate::settings::SettingResponse>> {
    crate::settings::get_setting_inner(&state, &user, &key).await
}

async fn update_setting_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(key): Path<String>,
    Json(req): Json<crate::settings::UpdateSettingRequest>,
) -> Result<Json<crate::settings::SettingResponse>> {
    crate::settings::update_setting_inner(&state, &user, &key, req).await
}

async fn balance_report_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<crate::balance::BalanceReport>> {
    crate::balance::balance_report_inner(&state, &user).await
}

fn csv_response(csv: String) -> Response {
    ([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv).into_response()
}
