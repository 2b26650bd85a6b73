use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    /// Present in the schema but never produced: releases settle instantly
    /// and create payouts directly in `Released`.
    Pending,
    Released,
    Withdrawn,
}

/// Funds earmarked for a creator on a specific campaign. `amount` is the
/// payout after the payout fee and is immutable once created.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct Payout {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub campaign_id: Uuid,
    /// Nulled if the backing payment row ever goes away.
    pub payment_id: Option<Uuid>,
    pub amount: Decimal,
    pub status: PayoutStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payout {
    /// Creates a payout directly in the `Released` state, the only way
    /// payouts come into existence.
    pub fn released(creator_id: Uuid, campaign_id: Uuid, payment_id: Uuid, amount: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            creator_id,
            campaign_id,
            payment_id: Some(payment_id),
            amount,
            status: PayoutStatus::Released,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
