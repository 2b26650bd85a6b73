//! Fee registry: named percentage settings with fallback defaults.
//!
//! Reads are get-or-initialize: a missing row is seeded with its default
//! value inside the same session as the read, so a fresh store converges to
//! the seeded state on first use and restarts are idempotent.

use crate::domain::actor::Actor;
use crate::domain::money::round_rate;
use crate::domain::ports::EscrowSession;
use crate::domain::settings::{DEFAULT_FEE_VALUE, FeeKey, SystemSetting};
use crate::error::{EscrowError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Returns the base platform fee, seeding the default row on first read.
pub async fn platform_fee(session: &mut dyn EscrowSession) -> Result<Decimal> {
    let setting = ensure_default(session, FeeKey::PlatformFee, DEFAULT_FEE_VALUE).await?;
    Ok(setting.value)
}

/// Returns the deposit fee rate, falling back to the live base fee when no
/// deposit-specific row exists.
pub async fn deposit_fee_rate(session: &mut dyn EscrowSession) -> Result<Decimal> {
    let fallback = platform_fee(session).await?;
    let setting = ensure_default(session, FeeKey::PlatformFeeDeposit, fallback).await?;
    Ok(setting.value)
}

/// Returns the payout fee rate, falling back to the live base fee when no
/// payout-specific row exists.
pub async fn payout_fee_rate(session: &mut dyn EscrowSession) -> Result<Decimal> {
    let fallback = platform_fee(session).await?;
    let setting = ensure_default(session, FeeKey::PlatformFeePayout, fallback).await?;
    Ok(setting.value)
}

/// Updates a fee setting, quantized to 4 decimal places.
///
/// Rates must satisfy `0 < value < 1`. The previous value and the acting
/// admin are recorded on the `fees` audit channel; the write itself lands in
/// the caller's session so a rolled-back commit also rolls back the update.
pub async fn set_fee(
    session: &mut dyn EscrowSession,
    key: FeeKey,
    value: Decimal,
    actor: Option<&Actor>,
) -> Result<SystemSetting> {
    if value <= Decimal::ZERO || value >= Decimal::ONE {
        return Err(EscrowError::Rejected(
            "Fee rate must be between 0 and 1".to_string(),
        ));
    }
    let value = round_rate(value);

    let fallback = match key {
        FeeKey::PlatformFee => DEFAULT_FEE_VALUE,
        _ => platform_fee(session).await?,
    };
    let existing = session.setting(key.as_str()).await?;
    let previous = existing.as_ref().map(|s| s.value).unwrap_or(fallback);

    let setting = match existing {
        Some(mut setting) => {
            setting.value = value;
            if setting.description.is_none() {
                setting.description = Some(key.default_description().to_string());
            }
            setting.touch();
            setting
        }
        None => SystemSetting::new(key.as_str(), value, key.default_description()),
    };
    session.upsert_setting(setting.clone()).await?;

    let actor_label = actor
        .map(|a| format!(" by {}", a.email))
        .unwrap_or_default();
    tracing::info!(
        target: "fees",
        "{} updated: {:.2}% -> {:.2}%{}",
        key,
        previous * dec!(100),
        value * dec!(100),
        actor_label,
    );
    Ok(setting)
}

/// Looks up `key`, inserting a row with `fallback` if none exists. The
/// upsert is keyed by the unique setting key, so concurrent first reads
/// converge to a single row.
async fn ensure_default(
    session: &mut dyn EscrowSession,
    key: FeeKey,
    fallback: Decimal,
) -> Result<SystemSetting> {
    if let Some(setting) = session.setting(key.as_str()).await? {
        return Ok(setting);
    }
    let setting = SystemSetting::new(key.as_str(), fallback, key.default_description());
    session.upsert_setting(setting.clone()).await?;
    Ok(setting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::Role;
    use crate::domain::ports::EscrowStore;
    use crate::infrastructure::in_memory::InMemoryStore;

    #[tokio::test]
    async fn test_platform_fee_defaults_to_ten_percent() {
        let store = InMemoryStore::new();
        let mut session = store.begin().await.unwrap();
        assert_eq!(platform_fee(session.as_mut()).await.unwrap(), dec!(0.10));
    }

    #[tokio::test]
    async fn test_specific_rates_fall_back_to_base_fee() {
        let store = InMemoryStore::new();
        let mut session = store.begin().await.unwrap();
        let admin = Actor::new(Role::Admin, "admin@example.com");

        set_fee(session.as_mut(), FeeKey::PlatformFee, dec!(0.25), Some(&admin))
            .await
            .unwrap();
        // Neither specific key has been set yet, so both read the base fee.
        assert_eq!(
            deposit_fee_rate(session.as_mut()).await.unwrap(),
            dec!(0.25)
        );
        assert_eq!(payout_fee_rate(session.as_mut()).await.unwrap(), dec!(0.25));
    }

    #[tokio::test]
    async fn test_fallback_is_captured_at_first_read() {
        let store = InMemoryStore::new();
        let mut session = store.begin().await.unwrap();
        let admin = Actor::new(Role::Admin, "admin@example.com");

        // First read seeds platform_fee_deposit from the current base fee.
        assert_eq!(
            deposit_fee_rate(session.as_mut()).await.unwrap(),
            dec!(0.10)
        );
        set_fee(session.as_mut(), FeeKey::PlatformFee, dec!(0.30), Some(&admin))
            .await
            .unwrap();
        // The seeded row keeps its own value from now on.
        assert_eq!(
            deposit_fee_rate(session.as_mut()).await.unwrap(),
            dec!(0.10)
        );
    }

    #[tokio::test]
    async fn test_set_fee_validates_range() {
        let store = InMemoryStore::new();
        let mut session = store.begin().await.unwrap();

        for bad in [dec!(0), dec!(-0.1), dec!(1), dec!(1.5)] {
            let result = set_fee(session.as_mut(), FeeKey::PlatformFee, bad, None).await;
            assert!(matches!(result, Err(EscrowError::Rejected(_))));
        }
    }

    #[tokio::test]
    async fn test_set_fee_quantizes_to_four_places() {
        let store = InMemoryStore::new();
        let mut session = store.begin().await.unwrap();

        let setting = set_fee(session.as_mut(), FeeKey::PlatformFeePayout, dec!(0.12345), None)
            .await
            .unwrap();
        assert_eq!(setting.value, dec!(0.1235));
        assert_eq!(
            payout_fee_rate(session.as_mut()).await.unwrap(),
            dec!(0.1235)
        );
    }

    #[tokio::test]
    async fn test_ensure_default_is_idempotent() {
        let store = InMemoryStore::new();
        let mut session = store.begin().await.unwrap();

        let first = platform_fee(session.as_mut()).await.unwrap();
        let second = platform_fee(session.as_mut()).await.unwrap();
        assert_eq!(first, second);

        let setting = session.setting(FeeKey::PlatformFee.as_str()).await.unwrap();
        assert!(setting.is_some());
    }
}
