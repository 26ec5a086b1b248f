//! End-to-end sheet handling as an API consumer would see it: the export
//! builders produce a CSV that the import parser reads back, and parsed rows
//! resolve against a resident roster. No database is involved; the storage
//! side of import/export is exercised elsewhere.

mod common;

use std::collections::HashMap;

use entity::users::Role;
use rust_decimal::Decimal;
use server::dues::export::{sheet_header, sheet_row};
use server::dues::import::{match_resident, parse_sheet};
use server::period::{format_period, FIXED_DUES_AMOUNT};

#[test]
fn test_exported_sheet_parses_back() {
    let budi = common::resident("usr_budi", "Budi Santoso", Some("Blok C2 No. 14"), Role::Warga);
    let siti = common::resident("usr_siti", "Siti Aminah", Some("Blok A1 No. 3"), Role::Warga);

    let mut budi_paid = HashMap::new();
    budi_paid.insert("2025-01".to_string(), FIXED_DUES_AMOUNT);
    budi_paid.insert("2025-04".to_string(), FIXED_DUES_AMOUNT);
    let siti_paid = HashMap::new();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(sheet_header(2025)).unwrap();
    writer.write_record(sheet_row(1, &budi, 2025, &budi_paid)).unwrap();
    writer.write_record(sheet_row(2, &siti, 2025, &siti_paid)).unwrap();
    let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();

    let sheet = parse_sheet(&text).unwrap();
    assert!(sheet.failures.is_empty());
    assert_eq!(sheet.months.len(), 12);
    assert_eq!(sheet.periods()[0], "2025-01");
    assert_eq!(sheet.periods()[11], "2025-12");
    assert_eq!(sheet.rows.len(), 2);

    let parsed_budi = &sheet.rows[0];
    assert_eq!(parsed_budi.name, "Budi Santoso");
    assert_eq!(parsed_budi.payments[0], Some(FIXED_DUES_AMOUNT));
    assert_eq!(parsed_budi.payments[1], None);
    assert_eq!(parsed_budi.payments[3], Some(FIXED_DUES_AMOUNT));

    let parsed_siti = &sheet.rows[1];
    assert!(parsed_siti.payments.iter().all(Option::is_none));
}

#[test]
fn test_parsed_rows_resolve_against_roster() {
    let roster = vec![
        common::resident("usr_budi", "Budi Santoso", Some("Blok C2 No. 14"), Role::Warga),
        common::resident("usr_budi2", "Budi Santoso", Some("Blok D1 No. 2"), Role::Warga),
        common::resident("usr_siti", "Siti Aminah", Some("Blok A1 No. 3"), Role::Warga),
    ];

    let text = "\
No,Nama,Alamat,Mulai,Jan-25
1,BUDI SANTOSO,blok d1 no. 2,2025-01,50000
2,Siti Aminah,Blok A1 No. 3,2025-01,
3,Joko Widodo,Blok B5,2025-01,50000
";
    let sheet = parse_sheet(text).unwrap();
    assert_eq!(sheet.rows.len(), 3);

    // Shared name resolved by address, both case-insensitively.
    let row = &sheet.rows[0];
    let matched = match_resident(&roster, &row.name, &row.address).unwrap();
    assert_eq!(matched.id, "usr_budi2");

    let row = &sheet.rows[1];
    let matched = match_resident(&roster, &row.name, &row.address).unwrap();
    assert_eq!(matched.id, "usr_siti");

    // Unknown resident: the importer would create an account for this row.
    let row = &sheet.rows[2];
    assert!(match_resident(&roster, &row.name, &row.address).is_none());
}

#[test]
fn test_header_and_periods_agree() {
    let header = sheet_header(2026);
    let months: Vec<String> = (1..=12).map(|m| format_period(2026, m)).collect();
    assert_eq!(header.len(), 4 + months.len());
    assert_eq!(header[4], "Jan-26");
    assert_eq!(header[15], "Dec-26");
}

#[test]
fn test_row_blank_cells_for_unpaid_months() {
    let budi = common::resident("usr_budi", "Budi Santoso", None, Role::Warga);
    let mut paid = HashMap::new();
    paid.insert("2025-06".to_string(), Decimal::new(75_000, 0));

    let row = sheet_row(7, &budi, 2025, &paid);
    assert_eq!(row[0], "7");
    assert_eq!(row[2], "");
    assert_eq!(row[4 + 5], "75000");
    assert_eq!(row.iter().filter(|c| c.as_str() == "75000").count(), 1);
}
