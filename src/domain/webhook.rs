use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEPOSIT_CONFIRMED: &str = "deposit_confirmed";
pub const PAYOUT_PAID: &str = "payout_paid";

/// Asynchronous confirmation payload from the external payment processor.
///
/// Everything except `event` is optional: the bank simulator retries
/// deliveries and must never be answered with a failure, so malformed or
/// unknown payloads are acknowledged and ignored.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct BankEvent {
    pub event: String,
    #[serde(default)]
    pub payment_id: Option<Uuid>,
    #[serde(default)]
    pub payout_id: Option<Uuid>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl BankEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            payment_id: None,
            payout_id: None,
            status: None,
            metadata: None,
        }
    }

    pub fn deposit_confirmed(payment_id: Uuid) -> Self {
        Self {
            payment_id: Some(payment_id),
            ..Self::new(DEPOSIT_CONFIRMED)
        }
    }

    pub fn payout_paid(payout_id: Uuid) -> Self {
        Self {
            payout_id: Some(payout_id),
            ..Self::new(PAYOUT_PAID)
        }
    }
}

/// The unconditional acknowledgement returned to the webhook sender.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct BankAck {
    pub status: String,
    pub event: String,
}

impl BankAck {
    pub fn accepted(event: impl Into<String>) -> Self {
        Self {
            status: "accepted".to_string(),
            event: event.into(),
        }
    }
}
