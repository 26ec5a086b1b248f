//! # Dues Lifecycle Module
//!
//! The "iuran" engine: periodic/yearly/custom generation, proof submission,
//! confirmation, bulk payment recording, status summaries, and the
//! spreadsheet import/export pair.
//!
//! State machine per record:
//! `unpaid -> pending` (resident submits proof) `-> paid | rejected`
//! (officer); `rejected -> pending` on resubmission; `unpaid -> paid`
//! directly via officer bulk payment.

pub mod engine;
pub mod export;
pub mod handlers;
pub mod import;

pub use engine::{backfill_for_resident, generate_custom, generate_periodic, generate_yearly};
