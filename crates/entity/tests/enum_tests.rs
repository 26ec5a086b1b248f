//! Enum round-trip tests for entity active enums.

use entity::{
    dues::{DuesStatus, DuesType},
    events::EventStatus,
    users::{Role, UserStatus},
};

#[test]
fn test_role_from_string_round_trip() {
    for role in [
        Role::Admin,
        Role::Rt,
        Role::Rw,
        Role::Bendahara,
        Role::Sekretaris,
        Role::Satpam,
        Role::Warga,
    ] {
        let s = role.to_string();
        assert_eq!(Role::from_string(&s), Some(role), "round trip for {}", s);
    }
    assert_eq!(Role::from_string("ketua"), None);
    assert_eq!(Role::from_string(""), None);
}

#[test]
fn test_officer_roles() {
    assert!(Role::Admin.is_officer());
    assert!(Role::Rt.is_officer());
    assert!(Role::Rw.is_officer());
    assert!(Role::Bendahara.is_officer());
    assert!(!Role::Sekretaris.is_officer());
    assert!(!Role::Satpam.is_officer());
    assert!(!Role::Warga.is_officer());
}

#[test]
fn test_user_status_from_string_round_trip() {
    for status in [UserStatus::Active, UserStatus::Inactive, UserStatus::Away] {
        let s = status.to_string();
        assert_eq!(UserStatus::from_string(&s), Some(status));
    }
    assert_eq!(UserStatus::from_string("suspended"), None);
}

#[test]
fn test_dues_status_from_string_round_trip() {
    for status in [
        DuesStatus::Unpaid,
        DuesStatus::Pending,
        DuesStatus::Paid,
        DuesStatus::Rejected,
    ] {
        let s = status.to_string();
        assert_eq!(DuesStatus::from_string(&s), Some(status));
    }
    assert_eq!(DuesStatus::from_string("confirmed"), None);
}

#[test]
fn test_dues_type_from_string_round_trip() {
    assert_eq!(DuesType::from_string("regular"), Some(DuesType::Regular));
    assert_eq!(DuesType::from_string("custom"), Some(DuesType::Custom));
    assert_eq!(DuesType::from_string("special"), None);
}

#[test]
fn test_event_status_from_string_round_trip() {
    for status in [
        EventStatus::Planning,
        EventStatus::Active,
        EventStatus::Completed,
    ] {
        let s = status.to_string();
        assert_eq!(EventStatus::from_string(&s), Some(status));
    }
}

#[test]
fn test_role_serde_lowercase() {
    let json = serde_json::to_string(&Role::Bendahara).unwrap();
    assert_eq!(json, "\"bendahara\"");
    let role: Role = serde_json::from_str("\"warga\"").unwrap();
    assert_eq!(role, Role::Warga);
}
