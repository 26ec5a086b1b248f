//! # Role Permissions
//!
//! Static role-to-permission map for the fixed community role set. Roles are
//! a column on the user record, so the map is compiled in; there is no
//! roles table to consult.
//!
//! Permissions follow a `resource:action` naming convention:
//! `dues:confirm`, `events:complete`, `inventory:update`.
//!
//! Ownership-scoped operations (a resident reading their own dues record or
//! submitting proof for it) are enforced by ownership checks in the
//! handlers, not by this map.

use std::collections::HashSet;

use entity::users::Role;
use error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Represents a single permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Resident-management permissions
    Residents(ResidentAction),
    /// Dues-lifecycle permissions
    Dues(DuesAction),
    /// Expense-ledger permissions
    Expenses(ExpenseAction),
    /// Event-ledger permissions
    Events(EventAction),
    /// Inventory permissions
    Inventory(InventoryAction),
    /// System-settings permissions
    Settings(SettingAction),
    /// Balance-report permissions
    Balance(BalanceAction),
}

/// Actions on the resident roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResidentAction {
    Create,
    Read,
    Update,
    Delete,
    Restore,
}

/// Actions on dues records (beyond a resident's own)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuesAction {
    /// List/inspect any resident's dues
    Read,
    /// Trigger periodic, yearly, or custom generation
    Generate,
    /// Confirm or reject submitted proofs
    Confirm,
    /// Record offline bulk payments
    Record,
    /// Destructive spreadsheet import
    Import,
    /// Spreadsheet export
    Export,
}

/// Actions on the general expense ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseAction {
    Create,
    Read,
    Update,
    Delete,
}

/// Actions on community events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventAction {
    Create,
    Read,
    Update,
    Delete,
    /// Add donations/expenses to the event ledger
    Ledger,
    /// Complete the event, forking expenses into the general ledger
    Complete,
}

/// Actions on inventory items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryAction {
    Create,
    Read,
    Update,
    Delete,
}

/// Actions on system settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingAction {
    Read,
    Update,
}

/// Actions on the balance report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalanceAction {
    Read,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Residents(a) => write!(f, "residents:{}", action_name(*a as usize, RESIDENT_ACTIONS)),
            Permission::Dues(a) => write!(f, "dues:{}", action_name(*a as usize, DUES_ACTIONS)),
            Permission::Expenses(a) => write!(f, "expenses:{}", action_name(*a as usize, CRUD_ACTIONS)),
            Permission::Events(a) => write!(f, "events:{}", action_name(*a as usize, EVENT_ACTIONS)),
            Permission::Inventory(a) => write!(f, "inventory:{}", action_name(*a as usize, CRUD_ACTIONS)),
            Permission::Settings(a) => write!(f, "settings:{}", action_name(*a as usize, SETTING_ACTIONS)),
            Permission::Balance(_) => write!(f, "balance:read"),
        }
    }
}

const RESIDENT_ACTIONS: &[&str] = &["create", "read", "update", "delete", "restore"];
const DUES_ACTIONS: &[&str] = &["read", "generate", "confirm", "record", "import", "export"];
const CRUD_ACTIONS: &[&str] = &["create", "read", "update", "delete"];
const EVENT_ACTIONS: &[&str] = &["create", "read", "update", "delete", "ledger", "complete"];
const SETTING_ACTIONS: &[&str] = &["read", "update"];

fn action_name(index: usize, names: &[&'static str]) -> &'static str { names[index] }

impl Permission {
    /// Parse a `resource:action` string into a Permission
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        let (resource, action) = s.split_once(':')?;
        match resource {
            "residents" => {
                match action {
                    "create" => Some(Permission::Residents(ResidentAction::Create)),
                    "read" => Some(Permission::Residents(ResidentAction::Read)),
                    "update" => Some(Permission::Residents(ResidentAction::Update)),
                    "delete" => Some(Permission::Residents(ResidentAction::Delete)),
                    "restore" => Some(Permission::Residents(ResidentAction::Restore)),
                    _ => None,
                }
            },
            "dues" => {
                match action {
                    "read" => Some(Permission::Dues(DuesAction::Read)),
                    "generate" => Some(Permission::Dues(DuesAction::Generate)),
                    "confirm" => Some(Permission::Dues(DuesAction::Confirm)),
                    "record" => Some(Permission::Dues(DuesAction::Record)),
                    "import" => Some(Permission::Dues(DuesAction::Import)),
                    "export" => Some(Permission::Dues(DuesAction::Export)),
                    _ => None,
                }
            },
            "expenses" => {
                match action {
                    "create" => Some(Permission::Expenses(ExpenseAction::Create)),
                    "read" => Some(Permission::Expenses(ExpenseAction::Read)),
                    "update" => Some(Permission::Expenses(ExpenseAction::Update)),
                    "delete" => Some(Permission::Expenses(ExpenseAction::Delete)),
                    _ => None,
                }
            },
            "events" => {
                match action {
                    "create" => Some(Permission::Events(EventAction::Create)),
                    "read" => Some(Permission::Events(EventAction::Read)),
                    "update" => Some(Permission::Events(EventAction::Update)),
                    "delete" => Some(Permission::Events(EventAction::Delete)),
                    "ledger" => Some(Permission::Events(EventAction::Ledger)),
                    "complete" => Some(Permission::Events(EventAction::Complete)),
                    _ => None,
                }
            },
            "inventory" => {
                match action {
                    "create" => Some(Permission::Inventory(InventoryAction::Create)),
                    "read" => Some(Permission::Inventory(InventoryAction::Read)),
                    "update" => Some(Permission::Inventory(InventoryAction::Update)),
                    "delete" => Some(Permission::Inventory(InventoryAction::Delete)),
                    _ => None,
                }
            },
            "settings" => {
                match action {
                    "read" => Some(Permission::Settings(SettingAction::Read)),
                    "update" => Some(Permission::Settings(SettingAction::Update)),
                    _ => None,
                }
            },
            "balance" => {
                match action {
                    "read" => Some(Permission::Balance(BalanceAction::Read)),
                    _ => None,
                }
            },
            _ => None,
        }
    }
}

/// Returns the full permission set for a role.
pub fn role_permissions(role: Role) -> HashSet<Permission> {
    use Permission::*;

    let mut perms = HashSet::new();

    // Every authenticated resident can see public ledgers
    perms.insert(Events(EventAction::Read));
    perms.insert(Inventory(InventoryAction::Read));
    perms.insert(Expenses(ExpenseAction::Read));
    perms.insert(Balance(BalanceAction::Read));

    match role {
        Role::Warga => {},
        Role::Satpam => {
            perms.insert(Residents(ResidentAction::Read));
        },
        Role::Sekretaris => {
            perms.insert(Residents(ResidentAction::Read));
            perms.extend([
                Events(EventAction::Create),
                Events(EventAction::Update),
                Events(EventAction::Delete),
                Events(EventAction::Ledger),
                Events(EventAction::Complete),
                Inventory(InventoryAction::Create),
                Inventory(InventoryAction::Update),
                Inventory(InventoryAction::Delete),
            ]);
        },
        Role::Bendahara => {
            perms.insert(Residents(ResidentAction::Read));
            perms.extend([
                Dues(DuesAction::Read),
                Dues(DuesAction::Generate),
                Dues(DuesAction::Confirm),
                Dues(DuesAction::Record),
                Dues(DuesAction::Import),
                Dues(DuesAction::Export),
                Expenses(ExpenseAction::Create),
                Expenses(ExpenseAction::Update),
                Expenses(ExpenseAction::Delete),
                Events(EventAction::Ledger),
            ]);
        },
        Role::Rt | Role::Rw => {
            perms.extend([
                Residents(ResidentAction::Create),
                Residents(ResidentAction::Read),
                Residents(ResidentAction::Update),
                Residents(ResidentAction::Delete),
                Residents(ResidentAction::Restore),
                Dues(DuesAction::Read),
                Dues(DuesAction::Generate),
                Dues(DuesAction::Confirm),
                Dues(DuesAction::Record),
                Dues(DuesAction::Import),
                Dues(DuesAction::Export),
                Expenses(ExpenseAction::Create),
                Expenses(ExpenseAction::Update),
                Expenses(ExpenseAction::Delete),
                Settings(SettingAction::Read),
            ]);
        },
        Role::Admin => {
            perms.extend([
                Residents(ResidentAction::Create),
                Residents(ResidentAction::Read),
                Residents(ResidentAction::Update),
                Residents(ResidentAction::Delete),
                Residents(ResidentAction::Restore),
                Dues(DuesAction::Read),
                Dues(DuesAction::Generate),
                Dues(DuesAction::Confirm),
                Dues(DuesAction::Record),
                Dues(DuesAction::Import),
                Dues(DuesAction::Export),
                Expenses(ExpenseAction::Create),
                Expenses(ExpenseAction::Update),
                Expenses(ExpenseAction::Delete),
                Events(EventAction::Create),
                Events(EventAction::Update),
                Events(EventAction::Delete),
                Events(EventAction::Ledger),
                Events(EventAction::Complete),
                Inventory(InventoryAction::Create),
                Inventory(InventoryAction::Update),
                Inventory(InventoryAction::Delete),
                Settings(SettingAction::Read),
                Settings(SettingAction::Update),
            ]);
        },
    }

    perms
}

/// Checks that a role carries a permission, returning Forbidden otherwise.
pub fn require_permission(role: Role, permission: Permission) -> Result<()> {
    if role_permissions(role).contains(&permission) {
        Ok(())
    }
    else {
        Err(AppError::forbidden(format!(
            "Role '{}' lacks permission '{}'",
            role, permission
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_display() {
        assert_eq!(
            Permission::Dues(DuesAction::Confirm).to_string(),
            "dues:confirm"
        );
        assert_eq!(
            Permission::Events(EventAction::Complete).to_string(),
            "events:complete"
        );
        assert_eq!(
            Permission::Residents(ResidentAction::Restore).to_string(),
            "residents:restore"
        );
        assert_eq!(
            Permission::Balance(BalanceAction::Read).to_string(),
            "balance:read"
        );
    }

    #[test]
    fn test_from_string_round_trip() {
        for perm in [
            Permission::Residents(ResidentAction::Create),
            Permission::Dues(DuesAction::Import),
            Permission::Expenses(ExpenseAction::Delete),
            Permission::Events(EventAction::Ledger),
            Permission::Inventory(InventoryAction::Update),
            Permission::Settings(SettingAction::Update),
            Permission::Balance(BalanceAction::Read),
        ] {
            let s = perm.to_string();
            assert_eq!(Permission::from_string(&s), Some(perm), "round trip for {}", s);
        }
    }

    #[test]
    fn test_from_string_invalid() {
        assert_eq!(Permission::from_string("dues"), None);
        assert_eq!(Permission::from_string("dues:destroy"), None);
        assert_eq!(Permission::from_string("vehicles:read"), None);
        assert_eq!(Permission::from_string(""), None);
    }

    #[test]
    fn test_warga_cannot_manage_dues() {
        let perms = role_permissions(Role::Warga);
        assert!(!perms.contains(&Permission::Dues(DuesAction::Confirm)));
        assert!(!perms.contains(&Permission::Dues(DuesAction::Generate)));
        assert!(perms.contains(&Permission::Balance(BalanceAction::Read)));
        assert!(perms.contains(&Permission::Events(EventAction::Read)));
    }

    #[test]
    fn test_bendahara_manages_payments_and_expenses() {
        let perms = role_permissions(Role::Bendahara);
        assert!(perms.contains(&Permission::Dues(DuesAction::Confirm)));
        assert!(perms.contains(&Permission::Dues(DuesAction::Record)));
        assert!(perms.contains(&Permission::Expenses(ExpenseAction::Create)));
        assert!(!perms.contains(&Permission::Events(EventAction::Complete)));
        assert!(!perms.contains(&Permission::Residents(ResidentAction::Delete)));
    }

    #[test]
    fn test_sekretaris_manages_events_and_inventory() {
        let perms = role_permissions(Role::Sekretaris);
        assert!(perms.contains(&Permission::Events(EventAction::Complete)));
        assert!(perms.contains(&Permission::Inventory(InventoryAction::Create)));
        assert!(!perms.contains(&Permission::Dues(DuesAction::Read)));
    }

    #[test]
    fn test_rt_manages_residents() {
        let perms = role_permissions(Role::Rt);
        assert!(perms.contains(&Permission::Residents(ResidentAction::Create)));
        assert!(perms.contains(&Permission::Residents(ResidentAction::Restore)));
        assert!(perms.contains(&Permission::Dues(DuesAction::Import)));
        assert!(!perms.contains(&Permission::Settings(SettingAction::Update)));
    }

    #[test]
    fn test_admin_has_settings_update() {
        assert!(require_permission(Role::Admin, Permission::Settings(SettingAction::Update)).is_ok());
    }

    #[test]
    fn test_require_permission_forbidden() {
        let err = require_permission(Role::Warga, Permission::Dues(DuesAction::Confirm)).unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
        assert!(err.message().contains("dues:confirm"));
    }
}
