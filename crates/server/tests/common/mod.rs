//! Shared fixtures for server integration tests.
//!
//! Pure fixture builders plus database-backed setup. The database helpers
//! connect to the PostgreSQL instance named by `DATABASE_URL` and bring the
//! schema up to date; when the variable is unset they return `None` so the
//! suite degrades to the pure tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use entity::dues::{self, DuesStatus, DuesType};
use entity::users::{self, Role, UserStatus};
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Database, Set};
use server::middleware::auth::AuthenticatedUser;
use server::notify::{NotificationPayload, NotificationSender};
use server::storage::FsImageStore;
use server::AppState;

/// A resident record with sensible defaults for tests.
pub fn resident(id: &str, full_name: &str, address: Option<&str>, role: Role) -> users::Model {
    let now = Utc::now();
    users::Model {
        id:            id.to_string(),
        email:         format!("{}@rukun.local", id),
        username:      id.to_string(),
        full_name:     full_name.to_string(),
        password_hash: "$argon2id$stub".to_string(),
        role,
        address:       address.map(str::to_string),
        phone:         None,
        position:      None,
        status:        UserStatus::Active,
        is_deleted:    false,
        deleted_at:    None,
        push_token:    None,
        created_at:    now,
        updated_at:    now,
    }
}

/// An unpaid regular dues record for a resident and period.
pub fn dues_record(id: &str, user_id: &str, period: &str, status: DuesStatus) -> dues::Model {
    let now = Utc::now();
    dues::Model {
        id:             id.to_string(),
        user_id:        user_id.to_string(),
        period:         period.to_string(),
        amount:         Decimal::new(50_000, 0),
        status,
        dues_type:      DuesType::Regular,
        description:    None,
        proof_image:    None,
        submitted_at:   None,
        confirmed_at:   None,
        confirmed_by:   None,
        recorded_by:    None,
        paid_at:        None,
        payment_method: None,
        note:           None,
        is_imported:    false,
        created_at:     now,
        updated_at:     now,
    }
}

/// An authenticated request context carrying the given role.
pub fn authed(id: &str, role: Role) -> AuthenticatedUser {
    AuthenticatedUser {
        id:    id.to_string(),
        email: format!("{}@rukun.local", id),
        role,
    }
}

static SEQ: AtomicU64 = AtomicU64::new(0);

/// An id unique across parallel tests in this process.
pub fn unique_id() -> String {
    format!(
        "{}-{}-{}",
        std::process::id(),
        Utc::now().timestamp_millis(),
        SEQ.fetch_add(1, Ordering::Relaxed)
    )
}

/// Sender that records payloads instead of delivering them.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<(String, NotificationPayload)>>,
}

impl RecordingSender {
    pub fn kinds(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, payload)| payload.kind().to_string())
            .collect()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, push_token: &str, payload: &NotificationPayload) -> error::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((push_token.to_string(), payload.clone()));
        Ok(())
    }
}

fn base64_encode(input: &str) -> String {
    base64::Engine::encode(&base64::engine::general_purpose::STANDARD, input.as_bytes())
}

/// Application state wired to the `DATABASE_URL` database, with a recording
/// notification sender. Returns `None` when `DATABASE_URL` is unset.
pub async fn test_state() -> Option<(AppState, Arc<RecordingSender>)> {
    let database_url = std::env::var("DATABASE_URL").ok()?;

    static MIGRATED: tokio::sync::OnceCell<()> = tokio::sync::OnceCell::const_new();

    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    MIGRATED
        .get_or_init(|| async {
            Migrator::up(&db, None)
                .await
                .expect("Failed to migrate test database");
        })
        .await;

    let jwt_config = auth::JwtConfig {
        secret:             base64_encode("rukun-test-jwt-secret-at-least-32-bytes!!"),
        expiration_seconds: 3600,
        issuer:             "rukun-test".to_string(),
        audience:           "rukun-api-test".to_string(),
    };

    let sender = Arc::new(RecordingSender::default());
    let state = AppState {
        db,
        jwt_config,
        images: Arc::new(FsImageStore::new(std::env::temp_dir().join("rukun-test-proofs"))),
        notifier: sender.clone(),
        start_time: std::time::Instant::now(),
    };

    Some((state, sender))
}

/// Insert a resident row directly, bypassing the registration back-fill.
pub async fn seed_resident(state: &AppState, role: Role, push_token: Option<&str>) -> users::Model {
    let uid = unique_id();
    let now = Utc::now();
    users::ActiveModel {
        id:            Set(format!("usr_it{}", uid)),
        email:         Set(format!("it.{}@rukun.local", uid)),
        username:      Set(format!("warga{}", uid)),
        full_name:     Set(format!("Warga {}", uid)),
        password_hash: Set("$argon2id$stub".to_string()),
        role:          Set(role),
        address:       Set(None),
        phone:         Set(None),
        position:      Set(None),
        status:        Set(UserStatus::Active),
        is_deleted:    Set(false),
        deleted_at:    Set(None),
        push_token:    Set(push_token.map(str::to_string)),
        created_at:    Set(now),
        updated_at:    Set(now),
    }
    .insert(&state.db)
    .await
    .expect("Failed to insert resident")
}

/// Insert a regular dues row directly with the given status and metadata.
pub async fn seed_dues(
    state: &AppState,
    user_id: &str,
    period: &str,
    status: DuesStatus,
    note: Option<&str>,
    payment_method: Option<&str>,
) -> dues::Model {
    let now = Utc::now();
    dues::ActiveModel {
        id:             Set(format!("iur_it{}", unique_id())),
        user_id:        Set(user_id.to_string()),
        period:         Set(period.to_string()),
        amount:         Set(Decimal::new(50_000, 0)),
        status:         Set(status),
        dues_type:      Set(DuesType::Regular),
        description:    Set(None),
        proof_image:    Set(None),
        submitted_at:   Set(None),
        confirmed_at:   Set(None),
        confirmed_by:   Set(None),
        recorded_by:    Set(None),
        paid_at:        Set(None),
        payment_method: Set(payment_method.map(str::to_string)),
        note:           Set(note.map(str::to_string)),
        is_imported:    Set(false),
        created_at:     Set(now),
        updated_at:     Set(now),
    }
    .insert(&state.db)
    .await
    .expect("Failed to insert dues record")
}
