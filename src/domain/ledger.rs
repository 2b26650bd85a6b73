use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Deposit,
    /// Present in the schema but produced by no operation.
    Reserve,
    Release,
    Withdraw,
    Fee,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Payment,
    Payout,
}

/// Append-only ledger entry, one per monetary event. Entries are never
/// mutated or re-read to drive state transitions; they exist purely for
/// historical reporting.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: EntryKind,
    pub amount: Decimal,
    pub reference_id: Option<Uuid>,
    pub reference_type: Option<ReferenceKind>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(user_id: Uuid, kind: EntryKind, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            amount,
            reference_id: None,
            reference_type: None,
            description: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_reference(mut self, kind: ReferenceKind, id: Uuid) -> Self {
        self.reference_id = Some(id);
        self.reference_type = Some(kind);
        self
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
}
