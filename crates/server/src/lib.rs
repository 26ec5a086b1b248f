//! # Rukun API Server
//!
//! Axum-based HTTP API server for the Rukun community backend.
//!
//! ## Modules
//!
//! - [`auth`]: Login endpoint and JWT handling
//! - [`residents`]: Resident roster management with dues back-fill
//! - [`dues`]: Dues lifecycle engine (generation, proofs, payments, sheets)
//! - [`balance`]: Community balance aggregation
//! - [`expenses`]: General expense ledger with balance guard
//! - [`events`]: Community events with donation/expense sub-ledgers
//! - [`inventory`]: Inventory CRUD
//! - [`settings`]: Key-value system settings
//! - [`notify`]: Push-notification payloads and dispatch
//! - [`scheduler`]: In-process monthly generation and reminder ticker
//! - [`router`]: API route configuration

use std::sync::Arc;

pub use error::{AppError, Result};

pub mod auth;
pub mod balance;
pub mod dto;
pub mod dues;
pub mod events;
pub mod expenses;
pub mod inventory;
pub mod middleware;
pub mod notify;
pub mod period;
pub mod residents;
pub mod router;
pub mod scheduler;
pub mod settings;
pub mod storage;
pub mod utils;

pub use router::create_app_router;

use ::auth::JwtConfig;

use crate::{notify::NotificationSender, storage::ImageStore};

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db:         sea_orm::DbConn,
    /// JWT configuration
    pub jwt_config: JwtConfig,
    /// Proof-image storage backend
    pub images:     Arc<dyn ImageStore>,
    /// Push-notification delivery backend
    pub notifier:   Arc<dyn NotificationSender>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Builds the state with the default filesystem image store and the
    /// logging notification sender.
    pub fn new(db: sea_orm::DbConn, jwt_config: JwtConfig, image_root: impl Into<std::path::PathBuf>) -> Self {
        Self {
            db,
            jwt_config,
            images: Arc::new(storage::FsImageStore::new(image_root)),
            notifier: Arc::new(notify::LogSender),
            start_time: std::time::Instant::now(),
        }
    }
}
