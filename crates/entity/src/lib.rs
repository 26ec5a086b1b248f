//! # Rukun Entities
//!
//! Sea-ORM entity definitions for the Rukun RT/RW administrative backend.
//!
//! ## Entities
//!
//! - [`users`]: residents and officers with role-based access
//! - [`dues`]: monthly dues ("iuran") records, one per resident/period/type
//! - [`expenses`] / [`expense_items`]: expense ("pengeluaran") bookkeeping
//! - [`events`] / [`event_donations`] / [`event_expenses`]: community event ledgers
//! - [`inventory_items`]: community inventory tracking
//! - [`system_settings`]: key-value configuration store

pub mod dues;
pub mod event_donations;
pub mod event_expenses;
pub mod events;
pub mod expense_items;
pub mod expenses;
pub mod inventory_items;
pub mod system_settings;
pub mod users;

pub use dues::Entity as Dues;
pub use event_donations::Entity as EventDonations;
pub use event_expenses::Entity as EventExpenses;
pub use events::Entity as Events;
pub use expense_items::Entity as ExpenseItems;
pub use expenses::Entity as Expenses;
pub use inventory_items::Entity as InventoryItems;
pub use system_settings::Entity as SystemSettings;
pub use users::Entity as Users;

use cuid2::CuidConstructor;

/// Generates a prefixed CUID2 primary key, e.g. `usr_x8k2...`.
///
/// Prefixes keep identifiers self-describing in logs and API payloads.
pub fn new_id(prefix: &str) -> String {
    format!(
        "{}_{}",
        prefix,
        CuidConstructor::new().with_length(24).create_id()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_carries_prefix() {
        let id = new_id("iur");
        assert!(id.starts_with("iur_"));
        assert_eq!(id.len(), "iur_".len() + 24);
    }

    #[test]
    fn test_new_id_unique() {
        let a = new_id("usr");
        let b = new_id("usr");
        assert_ne!(a, b);
    }
}
