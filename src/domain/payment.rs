use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Hold,
    Reserved,
    Released,
    Paid,
    /// Reserved for a future refund path; no operation produces it.
    Refunded,
}

impl PaymentStatus {
    /// Statuses a release may start from. `Reserved` is only reachable via
    /// the bank confirmation webhook.
    pub fn is_releasable(self) -> bool {
        matches!(self, Self::Hold | Self::Reserved)
    }

    /// Funds still in custody, not yet withdrawn by a creator.
    pub fn in_escrow(self) -> bool {
        matches!(self, Self::Hold | Self::Reserved | Self::Released)
    }

    /// Funds awaiting bank confirmation or release.
    pub fn is_frozen(self) -> bool {
        matches!(self, Self::Hold | Self::Reserved)
    }
}

/// Brand funds placed in custody. `amount` is the net amount held after the
/// deposit fee was retained; `fee` is assigned once at release time.
///
/// Payments are never deleted; the lifecycle is
/// `Hold -> Reserved -> Released -> Paid`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub amount: Decimal,
    pub deposit_fee: Decimal,
    pub fee: Decimal,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new payment in the initial `Hold` state.
    pub fn hold(brand_id: Uuid, amount: Decimal, deposit_fee: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            brand_id,
            amount,
            deposit_fee,
            fee: Decimal::ZERO,
            status: PaymentStatus::Hold,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
