use crate::domain::ledger::LedgerEntry;
use crate::domain::payment::Payment;
use crate::domain::payout::Payout;
use crate::domain::ports::{EscrowSession, EscrowStore};
use crate::domain::settings::SystemSetting;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default, Clone)]
struct State {
    payments: HashMap<Uuid, Payment>,
    payouts: HashMap<Uuid, Payout>,
    ledger: Vec<LedgerEntry>,
    settings: HashMap<String, SystemSetting>,
}

/// A thread-safe in-memory store.
///
/// Sessions take a full copy of the state at `begin`, stage their writes on
/// the copy, and swap it back in on `commit`. Concurrent sessions on the
/// same rows are serialized by the status guards in the engine rather than
/// by locking, matching the optimistic-gate model of the backing store.
/// Ideal for tests and the CLI scenario runner.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EscrowStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn EscrowSession>> {
        let working = self.state.read().await.clone();
        Ok(Box::new(InMemorySession {
            shared: Arc::clone(&self.state),
            working,
        }))
    }
}

pub struct InMemorySession {
    shared: Arc<RwLock<State>>,
    working: State,
}

#[async_trait]
impl EscrowSession for InMemorySession {
    async fn insert_payment(&mut self, payment: Payment) -> Result<()> {
        self.working.payments.insert(payment.id, payment);
        Ok(())
    }

    async fn payment(&self, id: Uuid) -> Result<Option<Payment>> {
        Ok(self.working.payments.get(&id).cloned())
    }

    async fn update_payment(&mut self, payment: Payment) -> Result<()> {
        self.working.payments.insert(payment.id, payment);
        Ok(())
    }

    async fn payments_by_brand(&self, brand_id: Uuid) -> Result<Vec<Payment>> {
        let mut payments: Vec<Payment> = self
            .working
            .payments
            .values()
            .filter(|p| p.brand_id == brand_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.created_at);
        Ok(payments)
    }

    async fn all_payments(&self) -> Result<Vec<Payment>> {
        let mut payments: Vec<Payment> = self.working.payments.values().cloned().collect();
        payments.sort_by_key(|p| p.created_at);
        Ok(payments)
    }

    async fn insert_payout(&mut self, payout: Payout) -> Result<()> {
        self.working.payouts.insert(payout.id, payout);
        Ok(())
    }

    async fn payout(&self, id: Uuid) -> Result<Option<Payout>> {
        Ok(self.working.payouts.get(&id).cloned())
    }

    async fn update_payout(&mut self, payout: Payout) -> Result<()> {
        self.working.payouts.insert(payout.id, payout);
        Ok(())
    }

    async fn payouts_by_creator(&self, creator_id: Uuid) -> Result<Vec<Payout>> {
        let mut payouts: Vec<Payout> = self
            .working
            .payouts
            .values()
            .filter(|p| p.creator_id == creator_id)
            .cloned()
            .collect();
        payouts.sort_by_key(|p| p.created_at);
        Ok(payouts)
    }

    async fn append_entry(&mut self, entry: LedgerEntry) -> Result<()> {
        self.working.ledger.push(entry);
        Ok(())
    }

    async fn entries_by_user(&self, user_id: Uuid) -> Result<Vec<LedgerEntry>> {
        Ok(self
            .working
            .ledger
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn setting(&self, key: &str) -> Result<Option<SystemSetting>> {
        Ok(self.working.settings.get(key).cloned())
    }

    async fn upsert_setting(&mut self, setting: SystemSetting) -> Result<()> {
        self.working.settings.insert(setting.key.clone(), setting);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        *self.shared.write().await = self.working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        // Dropping the working copy is all it takes.
        Ok(())
    }
}
