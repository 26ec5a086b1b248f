//! # Push Notification Dispatch
//!
//! Payload construction for the six notification kinds plus a delivery
//! seam. Dispatch is fire-and-forget: delivery failures are logged and never
//! surface to the triggering request.

use std::sync::Arc;

use async_trait::async_trait;
use error::Result;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// A push-notification payload: `{ title, body, data: { type, ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body:  String,
    pub data:  serde_json::Value,
}

impl NotificationPayload {
    /// The `type` discriminator inside `data`.
    pub fn kind(&self) -> &str {
        self.data
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
    }
}

/// Dues proof confirmed or rejected by an officer.
pub fn iuran_status_update(dues_id: &str, period: &str, status: &str, note: Option<&str>) -> NotificationPayload {
    let body = match (status, note) {
        ("paid", _) => format!("Iuran {} telah dikonfirmasi lunas", period),
        ("rejected", Some(note)) => format!("Bukti iuran {} ditolak: {}", period, note),
        ("rejected", None) => format!("Bukti iuran {} ditolak", period),
        (other, _) => format!("Status iuran {} berubah menjadi {}", period, other),
    };

    NotificationPayload {
        title: "Status Iuran".to_string(),
        body,
        data: serde_json::json!({
            "type":    "iuran_status_update",
            "dues_id": dues_id,
            "period":  period,
            "status":  status,
            "note":    note,
        }),
    }
}

/// New monthly dues record generated.
pub fn new_iuran(period: &str, amount: Decimal) -> NotificationPayload {
    NotificationPayload {
        title: "Iuran Bulanan".to_string(),
        body:  format!("Iuran periode {} sebesar Rp{} telah diterbitkan", period, amount),
        data:  serde_json::json!({
            "type":   "new_iuran",
            "period": period,
            "amount": amount,
        }),
    }
}

/// Yearly batch of dues records generated.
pub fn new_yearly_iuran(year: i32, amount: Decimal) -> NotificationPayload {
    NotificationPayload {
        title: "Iuran Tahunan".to_string(),
        body:  format!("Iuran tahun {} sebesar Rp{} per bulan telah diterbitkan", year, amount),
        data:  serde_json::json!({
            "type":   "new_yearly_iuran",
            "year":   year,
            "amount": amount,
        }),
    }
}

/// One-off custom levy generated.
pub fn custom_iuran(period: &str, amount: Decimal, description: &str) -> NotificationPayload {
    NotificationPayload {
        title: "Iuran Khusus".to_string(),
        body:  format!("{}: Rp{} (periode {})", description, amount, period),
        data:  serde_json::json!({
            "type":        "custom_iuran",
            "period":      period,
            "amount":      amount,
            "description": description,
        }),
    }
}

/// Due-date reminder for residents with unpaid dues.
pub fn jatuh_tempo_reminder(period: &str) -> NotificationPayload {
    NotificationPayload {
        title: "Pengingat Iuran".to_string(),
        body:  format!("Iuran periode {} belum dibayar. Mohon segera melunasi.", period),
        data:  serde_json::json!({
            "type":   "jatuh_tempo_reminder",
            "period": period,
        }),
    }
}

/// Officer recorded an offline payment.
pub fn payment_recorded(periods: &[String], total: Decimal) -> NotificationPayload {
    NotificationPayload {
        title: "Pembayaran Dicatat".to_string(),
        body:  format!(
            "Pembayaran iuran sebesar Rp{} untuk {} periode telah dicatat",
            total,
            periods.len()
        ),
        data:  serde_json::json!({
            "type":    "payment_recorded",
            "periods": periods,
            "total":   total,
        }),
    }
}

/// Delivery backend for push notifications.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, push_token: &str, payload: &NotificationPayload) -> Result<()>;
}

/// Sender that only logs. Stands in until a real push transport is wired up.
pub struct LogSender;

#[async_trait]
impl NotificationSender for LogSender {
    async fn send(&self, push_token: &str, payload: &NotificationPayload) -> Result<()> {
        logging::info!(
            target: "notify",
            kind = payload.kind(),
            token_prefix = push_token.get(..8).unwrap_or(push_token),
            title = %payload.title,
            "Notification delivered to log sink"
        );
        Ok(())
    }
}

/// Fire-and-forget dispatch to one resident.
///
/// Residents without a push token are skipped silently.
pub fn dispatch_to_user(state: &AppState, user_id: &str, push_token: Option<String>, payload: NotificationPayload) {
    let Some(token) = push_token.filter(|t| !t.is_empty()) else {
        return;
    };

    let notifier = Arc::clone(&state.notifier);
    let user_id = user_id.to_string();
    tokio::spawn(async move {
        match notifier.send(&token, &payload).await {
            Ok(()) => logging::log_notification!(payload.kind(), user_id, true),
            Err(e) => {
                logging::warn!(
                    target: "notify",
                    user_id = %user_id,
                    kind = payload.kind(),
                    error = %e,
                    "Notification delivery failed"
                );
            },
        }
    });
}

/// Fire-and-forget fan-out to every active, non-deleted resident with a
/// push token.
pub async fn fan_out_to_residents(state: &AppState, payload: NotificationPayload) -> Result<usize> {
    let recipients = entity::users::Entity::find()
        .filter(entity::users::Column::IsDeleted.eq(false))
        .filter(entity::users::Column::PushToken.is_not_null())
        .all(&state.db)
        .await?;

    let count = recipients.len();
    for user in recipients {
        dispatch_to_user(state, &user.id, user.push_token.clone(), payload.clone());
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_update_paid() {
        let payload = iuran_status_update("iur_1", "2025-03", "paid", None);
        assert_eq!(payload.kind(), "iuran_status_update");
        assert_eq!(payload.data["dues_id"], "iur_1");
        assert_eq!(payload.data["status"], "paid");
        assert!(payload.body.contains("2025-03"));
    }

    #[test]
    fn test_status_update_rejected_carries_note() {
        let payload = iuran_status_update("iur_1", "2025-03", "rejected", Some("foto buram"));
        assert_eq!(payload.data["note"], "foto buram");
        assert!(payload.body.contains("foto buram"));
    }

    #[test]
    fn test_all_kinds_have_expected_type() {
        let amount = Decimal::new(50_000, 0);
        let cases = vec![
            (iuran_status_update("d", "p", "paid", None), "iuran_status_update"),
            (new_iuran("2025-01", amount), "new_iuran"),
            (new_yearly_iuran(2025, amount), "new_yearly_iuran"),
            (custom_iuran("2025-01", amount, "Agustusan"), "custom_iuran"),
            (jatuh_tempo_reminder("2025-01"), "jatuh_tempo_reminder"),
            (payment_recorded(&["2025-01".to_string()], amount), "payment_recorded"),
        ];

        for (payload, expected) in cases {
            assert_eq!(payload.kind(), expected);
            assert!(!payload.title.is_empty());
            assert!(!payload.body.is_empty());
        }
    }

    #[test]
    fn test_payment_recorded_counts_periods() {
        let periods = vec!["2025-01".to_string(), "2025-02".to_string()];
        let payload = payment_recorded(&periods, Decimal::new(100_000, 0));
        assert!(payload.body.contains("2 periode"));
        assert_eq!(payload.data["periods"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_log_sender_accepts_payload() {
        let sender = LogSender;
        let payload = jatuh_tempo_reminder("2025-05");
        assert!(sender.send("ExponentPushToken[abc]", &payload).await.is_ok());
    }
}
