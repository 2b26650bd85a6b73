use crate::domain::ledger::LedgerEntry;
use crate::domain::payment::Payment;
use crate::domain::payout::Payout;
use crate::domain::ports::{EscrowSession, EscrowStore};
use crate::domain::settings::SystemSetting;
use crate::error::{EscrowError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Column Family for payment rows.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family for payout rows.
pub const CF_PAYOUTS: &str = "payouts";
/// Column Family for append-only ledger entries.
pub const CF_LEDGER: &str = "ledger";
/// Column Family for system settings, keyed by setting key.
pub const CF_SETTINGS: &str = "settings";

/// A persistent store implementation using RocksDB.
///
/// Each entity lives in its own Column Family with serde_json values.
/// Sessions stage their writes in memory and flush them as a single
/// `WriteBatch` on commit, which gives the atomic multi-row commit the
/// escrow operations rely on.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// all required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_PAYMENTS, CF_PAYOUTS, CF_LEDGER, CF_SETTINGS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();
        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self { db: Arc::new(db) })
    }
}

#[async_trait]
impl EscrowStore for RocksDbStore {
    async fn begin(&self) -> Result<Box<dyn EscrowSession>> {
        Ok(Box::new(RocksDbSession {
            db: Arc::clone(&self.db),
            payments: HashMap::new(),
            payouts: HashMap::new(),
            entries: Vec::new(),
            settings: HashMap::new(),
        }))
    }
}

/// One unit of work over the database: reads fall through to the committed
/// state, writes stay in the overlay until `commit`.
pub struct RocksDbSession {
    db: Arc<DB>,
    payments: HashMap<Uuid, Payment>,
    payouts: HashMap<Uuid, Payout>,
    entries: Vec<LedgerEntry>,
    settings: HashMap<String, SystemSetting>,
}

fn missing_cf(name: &str) -> EscrowError {
    EscrowError::Internal(Box::new(std::io::Error::other(format!(
        "{name} column family not found"
    ))))
}

impl RocksDbSession {
    fn get_committed<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &[u8],
    ) -> Result<Option<T>> {
        let cf = self.db.cf_handle(cf_name).ok_or_else(|| missing_cf(cf_name))?;
        match self.db.get_cf(&cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan_committed<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.db.cf_handle(cf_name).ok_or_else(|| missing_cf(cf_name))?;
        let mut rows = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            rows.push(serde_json::from_slice(&value)?);
        }
        Ok(rows)
    }
}

#[async_trait]
impl EscrowSession for RocksDbSession {
    async fn insert_payment(&mut self, payment: Payment) -> Result<()> {
        self.payments.insert(payment.id, payment);
        Ok(())
    }

    async fn payment(&self, id: Uuid) -> Result<Option<Payment>> {
        if let Some(payment) = self.payments.get(&id) {
            return Ok(Some(payment.clone()));
        }
        self.get_committed(CF_PAYMENTS, id.as_bytes())
    }

    async fn update_payment(&mut self, payment: Payment) -> Result<()> {
        self.payments.insert(payment.id, payment);
        Ok(())
    }

    async fn payments_by_brand(&self, brand_id: Uuid) -> Result<Vec<Payment>> {
        let mut payments = self.all_payments().await?;
        payments.retain(|p| p.brand_id == brand_id);
        Ok(payments)
    }

    async fn all_payments(&self) -> Result<Vec<Payment>> {
        let mut by_id: HashMap<Uuid, Payment> = self
            .scan_committed::<Payment>(CF_PAYMENTS)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        for (id, payment) in &self.payments {
            by_id.insert(*id, payment.clone());
        }
        let mut payments: Vec<Payment> = by_id.into_values().collect();
        payments.sort_by_key(|p| p.created_at);
        Ok(payments)
    }

    async fn insert_payout(&mut self, payout: Payout) -> Result<()> {
        self.payouts.insert(payout.id, payout);
        Ok(())
    }

    async fn payout(&self, id: Uuid) -> Result<Option<Payout>> {
        if let Some(payout) = self.payouts.get(&id) {
            return Ok(Some(payout.clone()));
        }
        self.get_committed(CF_PAYOUTS, id.as_bytes())
    }

    async fn update_payout(&mut self, payout: Payout) -> Result<()> {
        self.payouts.insert(payout.id, payout);
        Ok(())
    }

    async fn payouts_by_creator(&self, creator_id: Uuid) -> Result<Vec<Payout>> {
        let mut by_id: HashMap<Uuid, Payout> = self
            .scan_committed::<Payout>(CF_PAYOUTS)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        for (id, payout) in &self.payouts {
            by_id.insert(*id, payout.clone());
        }
        let mut payouts: Vec<Payout> = by_id
            .into_values()
            .filter(|p| p.creator_id == creator_id)
            .collect();
        payouts.sort_by_key(|p| p.created_at);
        Ok(payouts)
    }

    async fn append_entry(&mut self, entry: LedgerEntry) -> Result<()> {
        self.entries.push(entry);
        Ok(())
    }

    async fn entries_by_user(&self, user_id: Uuid) -> Result<Vec<LedgerEntry>> {
        let mut entries: Vec<LedgerEntry> = self.scan_committed(CF_LEDGER)?;
        entries.extend(self.entries.iter().cloned());
        entries.retain(|e| e.user_id == user_id);
        entries.sort_by_key(|e| e.created_at);
        Ok(entries)
    }

    async fn setting(&self, key: &str) -> Result<Option<SystemSetting>> {
        if let Some(setting) = self.settings.get(key) {
            return Ok(Some(setting.clone()));
        }
        self.get_committed(CF_SETTINGS, key.as_bytes())
    }

    async fn upsert_setting(&mut self, setting: SystemSetting) -> Result<()> {
        self.settings.insert(setting.key.clone(), setting);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let cf_payments = self
            .db
            .cf_handle(CF_PAYMENTS)
            .ok_or_else(|| missing_cf(CF_PAYMENTS))?;
        let cf_payouts = self
            .db
            .cf_handle(CF_PAYOUTS)
            .ok_or_else(|| missing_cf(CF_PAYOUTS))?;
        let cf_ledger = self
            .db
            .cf_handle(CF_LEDGER)
            .ok_or_else(|| missing_cf(CF_LEDGER))?;
        let cf_settings = self
            .db
            .cf_handle(CF_SETTINGS)
            .ok_or_else(|| missing_cf(CF_SETTINGS))?;

        let mut batch = WriteBatch::default();
        for (id, payment) in &self.payments {
            batch.put_cf(&cf_payments, id.as_bytes(), serde_json::to_vec(payment)?);
        }
        for (id, payout) in &self.payouts {
            batch.put_cf(&cf_payouts, id.as_bytes(), serde_json::to_vec(payout)?);
        }
        for entry in &self.entries {
            batch.put_cf(&cf_ledger, entry.id.as_bytes(), serde_json::to_vec(entry)?);
        }
        for setting in self.settings.values() {
            batch.put_cf(
                &cf_settings,
                setting.key.as_bytes(),
                serde_json::to_vec(setting)?,
            );
        }
        self.db.write(batch)?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        // The overlay never touched the database; dropping it suffices.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_creates_column_families() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).expect("Failed to open RocksDB");

        for name in [CF_PAYMENTS, CF_PAYOUTS, CF_LEDGER, CF_SETTINGS] {
            assert!(store.db.cf_handle(name).is_some());
        }
    }

    #[tokio::test]
    async fn test_commit_persists_staged_rows() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).unwrap();
        let payment = Payment::hold(Uuid::new_v4(), dec!(900.00), dec!(100.00));

        let mut session = store.begin().await.unwrap();
        session.insert_payment(payment.clone()).await.unwrap();
        session.commit().await.unwrap();

        let session = store.begin().await.unwrap();
        let stored = session.payment(payment.id).await.unwrap().unwrap();
        assert_eq!(stored, payment);
    }

    #[tokio::test]
    async fn test_rollback_leaves_database_untouched() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).unwrap();
        let payment = Payment::hold(Uuid::new_v4(), dec!(900.00), dec!(100.00));

        let mut session = store.begin().await.unwrap();
        session.insert_payment(payment.clone()).await.unwrap();
        session.rollback().await.unwrap();

        let session = store.begin().await.unwrap();
        assert!(session.payment(payment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overlay_reads_merge_with_committed_state() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).unwrap();
        let brand_id = Uuid::new_v4();

        let mut session = store.begin().await.unwrap();
        session
            .insert_payment(Payment::hold(brand_id, dec!(100.00), dec!(0)))
            .await
            .unwrap();
        session.commit().await.unwrap();

        let mut session = store.begin().await.unwrap();
        session
            .insert_payment(Payment::hold(brand_id, dec!(200.00), dec!(0)))
            .await
            .unwrap();
        // Committed row plus the staged one, both visible inside the session.
        assert_eq!(session.payments_by_brand(brand_id).await.unwrap().len(), 2);
    }
}
