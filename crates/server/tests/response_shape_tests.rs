//! Wire-shape tests for the JSON the API hands to clients. Mobile clients
//! bind to these shapes, so field names, flattening, and decimal-as-string
//! serialization are contracts, not implementation details.

mod common;

use chrono::{NaiveDate, Utc};
use entity::dues::DuesStatus;
use entity::events::{self, EventStatus};
use entity::users::Role;
use rust_decimal::Decimal;
use server::balance::{compute_report, EventContribution};
use server::dto::dues::DuesResponse;
use server::dto::events::{EventDetailResponse, EventResponse};
use server::dto::users::ResidentResponse;
use server::dues::engine::summarize_statuses;

fn event_model() -> events::Model {
    let now = Utc::now();
    events::Model {
        id:              "evt_1".to_string(),
        name:            "Agustusan 2025".to_string(),
        slug:            "agustusan-2025".to_string(),
        description:     None,
        event_date:      NaiveDate::from_ymd_opt(2025, 8, 17).unwrap(),
        total_donations: Decimal::new(750_000, 0),
        total_expenses:  Decimal::new(500_000, 0),
        balance:         Decimal::new(250_000, 0),
        status:          EventStatus::Active,
        completed_at:    None,
        created_by:      "usr_sekretaris".to_string(),
        created_at:      now,
        updated_at:      now,
    }
}

#[test]
fn test_resident_response_never_carries_password_hash() {
    let model = common::resident("usr_budi", "Budi Santoso", Some("Blok C2"), Role::Warga);
    let json = serde_json::to_value(ResidentResponse::from(model)).unwrap();

    assert!(json.get("password_hash").is_none());
    assert_eq!(json["id"], "usr_budi");
    assert_eq!(json["role"], "warga");
    assert_eq!(json["status"], "active");
}

#[test]
fn test_dues_response_serializes_amount_as_string() {
    let model = common::dues_record("iur_1", "usr_budi", "2025-03", DuesStatus::Unpaid);
    let json = serde_json::to_value(DuesResponse::from(model)).unwrap();

    assert_eq!(json["amount"], "50000");
    assert_eq!(json["status"], "unpaid");
    assert_eq!(json["dues_type"], "regular");
    assert_eq!(json["period"], "2025-03");
    assert_eq!(json["is_imported"], false);
}

#[test]
fn test_event_detail_flattens_event_fields() {
    let detail = EventDetailResponse {
        event:     EventResponse::from(event_model()),
        donations: vec![],
        expenses:  vec![],
    };
    let json = serde_json::to_value(detail).unwrap();

    // Flattened: event fields sit at the top level next to the ledgers.
    assert!(json.get("event").is_none());
    assert_eq!(json["name"], "Agustusan 2025");
    assert_eq!(json["status"], "active");
    assert_eq!(json["total_donations"], "750000");
    assert!(json["donations"].as_array().unwrap().is_empty());
    assert!(json["expenses"].as_array().unwrap().is_empty());
}

#[test]
fn test_status_summary_counts_and_total() {
    let statuses = [
        DuesStatus::Paid,
        DuesStatus::Paid,
        DuesStatus::Pending,
        DuesStatus::Rejected,
        DuesStatus::Unpaid,
        DuesStatus::Unpaid,
    ];
    let summary = summarize_statuses("2025-03", &statuses);
    let json = serde_json::to_value(summary).unwrap();

    assert_eq!(json["period"], "2025-03");
    assert_eq!(json["paid"], 2);
    assert_eq!(json["pending"], 1);
    assert_eq!(json["rejected"], 1);
    assert_eq!(json["unpaid"], 2);
    assert_eq!(json["total"], 6);
}

#[test]
fn test_balance_report_shape() {
    let report = compute_report(
        Decimal::new(100_000, 0),
        &[
            (Decimal::new(50_000, 0), false),
            (Decimal::new(50_000, 0), true), // imported, excluded from income
        ],
        vec![EventContribution {
            id:              "evt_1".to_string(),
            name:            "Agustusan 2025".to_string(),
            total_donations: Decimal::new(750_000, 0),
            completed_at:    Some(Utc::now()),
        }],
        &[Decimal::new(200_000, 0)],
    );
    let json = serde_json::to_value(report).unwrap();

    assert_eq!(json["initial_balance"], "100000");
    assert_eq!(json["total_iuran_income"], "50000");
    assert_eq!(json["total_event_donations"], "750000");
    assert_eq!(json["total_income"], "800000");
    assert_eq!(json["total_expense"], "200000");
    assert_eq!(json["balance"], "700000");
    assert_eq!(json["events"].as_array().unwrap().len(), 1);
}
