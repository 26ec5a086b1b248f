//! # Dues Sheet Export
//!
//! Mirrors the import layout: fixed columns (sequence, name, address, start
//! period) then one `MMM-YY` column per month of the requested year. Paid
//! cells carry the paid amount; everything else is left empty.

use entity::dues::{self, DuesStatus, DuesType, Entity as DuesEntity};
use entity::users::{self, Entity as UsersEntity, Role};
use error::{AppError, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::period::{format_period, month_label};

/// Build the header row for a year's sheet.
pub fn sheet_header(year: i32) -> Vec<String> {
    let mut header = vec![
        "No".to_string(),
        "Nama".to_string(),
        "Alamat".to_string(),
        "Mulai".to_string(),
    ];
    for month in 1..=12 {
        header.push(month_label(year, month));
    }
    header
}

/// Build one sheet row for a resident. Pure; `paid_amounts` maps period keys
/// to the paid amount for regular records.
pub fn sheet_row(
    sequence: usize,
    resident: &users::Model,
    year: i32,
    paid_amounts: &std::collections::HashMap<String, rust_decimal::Decimal>,
) -> Vec<String> {
    let mut row = vec![
        sequence.to_string(),
        resident.full_name.clone(),
        resident.address.clone().unwrap_or_default(),
        format_period(year, 1),
    ];
    for month in 1..=12 {
        let period = format_period(year, month);
        row.push(
            paid_amounts
                .get(&period)
                .map(|a| a.to_string())
                .unwrap_or_default(),
        );
    }
    row
}

/// Export the year's dues sheet as CSV text.
pub async fn export_sheet(db: &DatabaseConnection, year: i32) -> Result<String> {
    let residents = UsersEntity::find()
        .filter(users::Column::Role.ne(Role::Admin))
        .filter(users::Column::IsDeleted.eq(false))
        .order_by_asc(users::Column::FullName)
        .all(db)
        .await?;

    let periods: Vec<String> = (1..=12).map(|m| format_period(year, m)).collect();
    let paid_records = DuesEntity::find()
        .filter(dues::Column::Period.is_in(periods))
        .filter(dues::Column::DuesType.eq(DuesType::Regular))
        .filter(dues::Column::Status.eq(DuesStatus::Paid))
        .all(db)
        .await?;

    let mut paid_by_user: std::collections::HashMap<String, std::collections::HashMap<String, rust_decimal::Decimal>> =
        std::collections::HashMap::new();
    for record in paid_records {
        paid_by_user
            .entry(record.user_id.clone())
            .or_default()
            .insert(record.period, record.amount);
    }

    let empty = std::collections::HashMap::new();
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(sheet_header(year))
        .map_err(|e| AppError::internal(format!("CSV write failed: {}", e)))?;

    for (index, resident) in residents.iter().enumerate() {
        let paid = paid_by_user.get(&resident.id).unwrap_or(&empty);
        writer
            .write_record(sheet_row(index + 1, resident, year, paid))
            .map_err(|e| AppError::internal(format!("CSV write failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV write failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::internal(format!("CSV output was not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use entity::users::UserStatus;
    use rust_decimal::Decimal;

    use super::*;

    fn resident(name: &str, address: &str) -> users::Model {
        let now = Utc::now();
        users::Model {
            id:            "usr_1".to_string(),
            email:         "budi@rukun.local".to_string(),
            username:      "budi".to_string(),
            full_name:     name.to_string(),
            password_hash: "hash".to_string(),
            role:          Role::Warga,
            address:       Some(address.to_string()),
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

    #[test]
    fn test_sheet_header_shape() {
        let header = sheet_header(2025);
        assert_eq!(header.len(), 16);
        assert_eq!(header[0], "No");
        assert_eq!(header[4], "Jan-25");
        assert_eq!(header[15], "Dec-25");
    }

    #[test]
    fn test_sheet_row_carries_paid_amounts() {
        let mut paid = std::collections::HashMap::new();
        paid.insert("2025-01".to_string(), Decimal::new(50_000, 0));
        paid.insert("2025-03".to_string(), Decimal::new(50_000, 0));

        let row = sheet_row(1, &resident("Budi Santoso", "Blok C2 No. 14"), 2025, &paid);
        assert_eq!(row[1], "Budi Santoso");
        assert_eq!(row[2], "Blok C2 No. 14");
        assert_eq!(row[4], "50000");
        assert_eq!(row[5], "");
        assert_eq!(row[6], "50000");
    }

    #[test]
    fn test_export_round_trips_through_import_parser() {
        let mut paid = std::collections::HashMap::new();
        paid.insert("2025-02".to_string(), Decimal::new(50_000, 0));

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(sheet_header(2025)).unwrap();
        writer
            .write_record(sheet_row(1, &resident("Budi Santoso", "Blok C2"), 2025, &paid))
            .unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        let sheet = crate::dues::import::parse_sheet(&text).unwrap();
        assert_eq!(sheet.months.len(), 12);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].payments[1], Some(Decimal::new(50_000, 0)));
    }
}
