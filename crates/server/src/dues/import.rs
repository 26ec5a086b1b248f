//! # Dues Sheet Import
//!
//! CSV rendition of the community's paper bookkeeping sheet: a fixed header
//! (sequence, name, address, start period) followed by one `MMM-YY` column
//! per month. A non-empty cell means the resident paid that amount for that
//! month.
//!
//! Importing is a destructive rebuild per resident: all their dues in the
//! sheet's period range are deleted and regenerated from the cells. Rows are
//! isolated; a bad row is reported and skipped, the rest of the sheet still
//! applies.

use ::auth::password::hash_password;
use ::auth::secrecy::{ExposeSecret, SecretString};
use chrono::Utc;
use entity::dues::{self, DuesStatus, DuesType, Entity as DuesEntity};
use entity::users::{self, Entity as UsersEntity, Role, UserStatus};
use error::{AppError, Result};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::dto::dues::{ImportRowFailure, ImportSummary};
use crate::period::{format_period, parse_month_label, FIXED_DUES_AMOUNT};
use crate::utils::slugify;

/// Password assigned to residents created from a sheet row. Residents are
/// expected to change it on first login.
const DEFAULT_IMPORT_PASSWORD: &str = "warga12345";

/// Number of fixed columns before the month columns begin.
const FIXED_COLUMNS: usize = 4;

/// One parsed data row of the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// 1-based data-row number, header excluded.
    pub row_number: usize,
    pub name:       String,
    pub address:    String,
    /// One slot per month column; `Some(amount)` = paid.
    pub payments:   Vec<Option<Decimal>>,
}

/// The fully parsed sheet: month columns plus data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSheet {
    /// (year, month) per month column, in sheet order.
    pub months:   Vec<(i32, u32)>,
    pub rows:     Vec<SheetRow>,
    pub failures: Vec<ImportRowFailure>,
}

impl ParsedSheet {
    /// Period keys covered by the sheet, in column order.
    pub fn periods(&self) -> Vec<String> {
        self.months.iter().map(|&(y, m)| format_period(y, m)).collect()
    }
}

/// Parse the CSV sheet. Pure; touches no storage.
pub fn parse_sheet(csv_text: &str) -> Result<ParsedSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let mut records = reader.records();
    let header = records
        .next()
        .ok_or_else(|| AppError::bad_request("Sheet is empty"))?
        .map_err(|e| AppError::bad_request(format!("Unreadable sheet header: {}", e)))?;

    if header.len() <= FIXED_COLUMNS {
        return Err(AppError::bad_request("Sheet header has no month columns"));
    }

    let mut months = Vec::new();
    for label in header.iter().skip(FIXED_COLUMNS) {
        let (year, month) = parse_month_label(label.trim())?;
        months.push((year, month));
    }

    let mut rows = Vec::new();
    let mut failures = Vec::new();

    for (index, record) in records.enumerate() {
        let row_number = index + 1;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                failures.push(ImportRowFailure {
                    row:    row_number,
                    reason: format!("Unreadable row: {}", e),
                });
                continue;
            },
        };

        let name = record.get(1).unwrap_or("").trim().to_string();
        let address = record.get(2).unwrap_or("").trim().to_string();

        if name.is_empty() {
            failures.push(ImportRowFailure {
                row:    row_number,
                reason: "Name column is empty".to_string(),
            });
            continue;
        }

        let mut payments = Vec::with_capacity(months.len());
        let mut cell_error = None;
        for (col, _) in months.iter().enumerate() {
            let cell = record.get(FIXED_COLUMNS + col).unwrap_or("").trim();
            if cell.is_empty() {
                payments.push(None);
                continue;
            }
            match cell.replace(['.', ','], "").parse::<Decimal>() {
                Ok(amount) => payments.push(Some(amount)),
                Err(_) => {
                    cell_error = Some(format!("Unparseable amount '{}' in column {}", cell, FIXED_COLUMNS + col + 1));
                    break;
                },
            }
        }

        if let Some(reason) = cell_error {
            failures.push(ImportRowFailure { row: row_number, reason });
            continue;
        }

        rows.push(SheetRow {
            row_number,
            name,
            address,
            payments,
        });
    }

    Ok(ParsedSheet { months, rows, failures })
}

/// Match a sheet row to an existing resident, case-insensitively by name;
/// the address disambiguates residents sharing a name.
pub fn match_resident<'a>(residents: &'a [users::Model], name: &str, address: &str) -> Option<&'a users::Model> {
    let name_lower = name.trim().to_lowercase();
    let address_lower = address.trim().to_lowercase();

    let by_name: Vec<&users::Model> = residents
        .iter()
        .filter(|u| u.full_name.trim().to_lowercase() == name_lower)
        .collect();

    match by_name.len() {
        0 => None,
        1 => Some(by_name[0]),
        _ => by_name
            .into_iter()
            .find(|u| u.address.as_deref().unwrap_or("").trim().to_lowercase() == address_lower),
    }
}

/// Derive a unique username from a resident's name.
fn derive_username(name: &str, taken: &mut std::collections::HashSet<String>) -> String {
    let base = {
        let slug = slugify(name).replace('-', "");
        if slug.is_empty() { "warga".to_string() } else { slug }
    };

    let mut candidate = base.clone();
    let mut counter = 1;
    while taken.contains(&candidate) {
        counter += 1;
        candidate = format!("{}{}", base, counter);
    }
    taken.insert(candidate.clone());
    candidate
}

/// Import a parsed-and-validated sheet into the database.
pub async fn import_sheet(db: &DatabaseConnection, csv_text: &str) -> Result<ImportSummary> {
    let sheet = parse_sheet(csv_text)?;
    let periods = sheet.periods();

    let residents = UsersEntity::find()
        .filter(users::Column::IsDeleted.eq(false))
        .all(db)
        .await?;

    let mut taken: std::collections::HashSet<String> =
        residents.iter().map(|u| u.username.clone()).collect();

    let mut summary = ImportSummary {
        residents_created: 0,
        residents_matched: 0,
        dues_created:      0,
        failures:          sheet.failures.clone(),
    };

    let default_hash = hash_password(&SecretString::from(DEFAULT_IMPORT_PASSWORD.to_string()), None)
        .map_err(|e| AppError::internal(format!("Failed to hash default password: {}", e)))?;

    for row in &sheet.rows {
        let user_id = match match_resident(&residents, &row.name, &row.address) {
            Some(existing) => {
                summary.residents_matched += 1;
                existing.id.clone()
            },
            None => {
                let username = derive_username(&row.name, &mut taken);
                let now = Utc::now();
                let created = users::ActiveModel {
                    id:            Set(entity::new_id("usr")),
                    email:         Set(format!("{}@rukun.local", username)),
                    username:      Set(username),
                    full_name:     Set(row.name.clone()),
                    password_hash: Set(default_hash.expose_secret().to_string()),
                    role:          Set(Role::Warga),
                    address:       Set(if row.address.is_empty() { None } else { Some(row.address.clone()) }),
                    phone:         Set(None),
                    position:      Set(None),
                    status:        Set(UserStatus::Active),
                    is_deleted:    Set(false),
                    deleted_at:    Set(None),
                    push_token:    Set(None),
                    created_at:    Set(now),
                    updated_at:    Set(now),
                }
                .insert(db)
                .await;

                match created {
                    Ok(user) => {
                        summary.residents_created += 1;
                        user.id
                    },
                    Err(e) => {
                        summary.failures.push(ImportRowFailure {
                            row:    row.row_number,
                            reason: format!("Failed to create resident: {}", e),
                        });
                        continue;
                    },
                }
            },
        };

        if let Err(e) = rebuild_resident_dues(db, &user_id, &periods, &row.payments, &mut summary).await {
            summary.failures.push(ImportRowFailure {
                row:    row.row_number,
                reason: format!("Failed to rebuild dues: {}", e),
            });
        }
    }

    logging::info!(
        target: "dues",
        residents_created = summary.residents_created,
        residents_matched = summary.residents_matched,
        dues_created = summary.dues_created,
        failures = summary.failures.len(),
        "Sheet import finished"
    );

    Ok(summary)
}

/// Delete all of a resident's dues in the sheet's range and regenerate them
/// from the cells: paid (cell amount, imported) or unpaid (fixed amount).
async fn rebuild_resident_dues(
    db: &DatabaseConnection,
    user_id: &str,
    periods: &[String],
    payments: &[Option<Decimal>],
    summary: &mut ImportSummary,
) -> Result<()> {
    DuesEntity::delete_many()
        .filter(dues::Column::UserId.eq(user_id))
        .filter(dues::Column::Period.is_in(periods.iter().cloned()))
        .exec(db)
        .await?;

    let now = Utc::now();
    for (period, payment) in periods.iter().zip(payments) {
        let (status, amount, is_imported, paid_at) = match payment {
            Some(amount) => (DuesStatus::Paid, *amount, true, Some(now)),
            None => (DuesStatus::Unpaid, FIXED_DUES_AMOUNT, false, None),
        };

        dues::ActiveModel {
            id:             Set(entity::new_id("iur")),
            user_id:        Set(user_id.to_string()),
            period:         Set(period.clone()),
            amount:         Set(amount),
            status:         Set(status),
            dues_type:      Set(DuesType::Regular),
            description:    Set(None),
            proof_image:    Set(None),
            submitted_at:   Set(None),
            confirmed_at:   Set(None),
            confirmed_by:   Set(None),
            recorded_by:    Set(None),
            paid_at:        Set(paid_at),
            payment_method: Set(None),
            note:           Set(None),
            is_imported:    Set(is_imported),
            created_at:     Set(now),
            updated_at:     Set(now),
        }
        .insert(db)
        .await?;
        summary.dues_created += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
No,Nama,Alamat,Mulai,Jan-25,Feb-25,Mar-25
1,Budi Santoso,Blok C2 No. 14,2025-01,50000,,50000
2,Siti Aminah,Blok A1 No. 3,2025-01,,50000,
";

    #[test]
    fn test_parse_sheet_months_and_rows() {
        let sheet = parse_sheet(SHEET).unwrap();
        assert_eq!(sheet.months, vec![(2025, 1), (2025, 2), (2025, 3)]);
        assert_eq!(sheet.periods(), vec!["2025-01", "2025-02", "2025-03"]);
        assert_eq!(sheet.rows.len(), 2);
        assert!(sheet.failures.is_empty());

        let budi = &sheet.rows[0];
        assert_eq!(budi.name, "Budi Santoso");
        assert_eq!(budi.address, "Blok C2 No. 14");
        assert_eq!(
            budi.payments,
            vec![Some(Decimal::new(50_000, 0)), None, Some(Decimal::new(50_000, 0))]
        );
    }

    #[test]
    fn test_parse_sheet_isolates_bad_rows() {
        let text = "\
No,Nama,Alamat,Mulai,Jan-25
1,,Blok C2,2025-01,50000
2,Siti Aminah,Blok A1,2025-01,banyak
3,Budi Santoso,Blok C2,2025-01,50000
";
        let sheet = parse_sheet(text).unwrap();
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].name, "Budi Santoso");
        assert_eq!(sheet.failures.len(), 2);
        assert_eq!(sheet.failures[0].row, 1);
        assert_eq!(sheet.failures[1].row, 2);
    }

    #[test]
    fn test_parse_sheet_rejects_headerless_input() {
        assert!(parse_sheet("").is_err());
        assert!(parse_sheet("No,Nama,Alamat,Mulai\n").is_err());
    }

    #[test]
    fn test_parse_sheet_accepts_thousands_separators() {
        let text = "No,Nama,Alamat,Mulai,Jan-25\n1,Budi,Blok C2,2025-01,\"50.000\"\n";
        let sheet = parse_sheet(text).unwrap();
        assert_eq!(sheet.rows[0].payments, vec![Some(Decimal::new(50_000, 0))]);
    }

    fn resident(id: &str, name: &str, address: Option<&str>) -> users::Model {
        let now = Utc::now();
        users::Model {
            id:            id.to_string(),
            email:         format!("{}@rukun.local", id),
            username:      id.to_string(),
            full_name:     name.to_string(),
            password_hash: "hash".to_string(),
            role:          Role::Warga,
            address:       address.map(String::from),
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
    fn test_match_resident_case_insensitive() {
        let residents = vec![resident("usr_1", "Budi Santoso", Some("Blok C2 No. 14"))];
        let found = match_resident(&residents, "budi santoso", "anything");
        assert_eq!(found.map(|u| u.id.as_str()), Some("usr_1"));
    }

    #[test]
    fn test_match_resident_address_disambiguates() {
        let residents = vec![
            resident("usr_1", "Budi Santoso", Some("Blok C2 No. 14")),
            resident("usr_2", "Budi Santoso", Some("Blok D1 No. 2")),
        ];
        let found = match_resident(&residents, "Budi Santoso", "blok d1 no. 2");
        assert_eq!(found.map(|u| u.id.as_str()), Some("usr_2"));

        assert!(match_resident(&residents, "Budi Santoso", "Blok Z9").is_none());
    }

    #[test]
    fn test_derive_username_dedupes() {
        let mut taken = std::collections::HashSet::new();
        taken.insert("budisantoso".to_string());
        assert_eq!(derive_username("Budi Santoso", &mut taken), "budisantoso2");
        assert_eq!(derive_username("Budi Santoso", &mut taken), "budisantoso3");
        assert_eq!(derive_username("!!!", &mut taken), "warga");
    }
}
