use super::ledger::LedgerEntry;
use super::payment::Payment;
use super::payout::Payout;
use super::settings::SystemSetting;
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// The persistence collaborator. `begin` opens a single atomic unit of work;
/// each escrow operation runs inside exactly one session.
#[async_trait]
pub trait EscrowStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn EscrowSession>>;
}

/// One transactional session over the backing store.
///
/// Writes staged through a session are invisible to other sessions until
/// `commit`; `rollback` (or dropping the session) discards them. The caller
/// owns the commit/rollback decision, never the escrow operations
/// themselves.
#[async_trait]
pub trait EscrowSession: Send + Sync {
    async fn insert_payment(&mut self, payment: Payment) -> Result<()>;
    async fn payment(&self, id: Uuid) -> Result<Option<Payment>>;
    async fn update_payment(&mut self, payment: Payment) -> Result<()>;
    async fn payments_by_brand(&self, brand_id: Uuid) -> Result<Vec<Payment>>;
    async fn all_payments(&self) -> Result<Vec<Payment>>;

    async fn insert_payout(&mut self, payout: Payout) -> Result<()>;
    async fn payout(&self, id: Uuid) -> Result<Option<Payout>>;
    async fn update_payout(&mut self, payout: Payout) -> Result<()>;
    async fn payouts_by_creator(&self, creator_id: Uuid) -> Result<Vec<Payout>>;

    async fn append_entry(&mut self, entry: LedgerEntry) -> Result<()>;
    async fn entries_by_user(&self, user_id: Uuid) -> Result<Vec<LedgerEntry>>;

    async fn setting(&self, key: &str) -> Result<Option<SystemSetting>>;
    async fn upsert_setting(&mut self, setting: SystemSetting) -> Result<()>;

    async fn commit(self: Box<Self>) -> Result<()>;
    async fn rollback(self: Box<Self>) -> Result<()>;
}

pub type EscrowStoreBox = Box<dyn EscrowStore>;
