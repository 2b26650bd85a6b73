mod common;

use escrow_ledger::domain::payment::PaymentStatus;
use escrow_ledger::domain::ports::EscrowStore;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// A rolled-back session leaves no trace: no payment, no ledger entries,
/// no seeded fee settings.
#[tokio::test]
async fn test_rollback_discards_all_staged_writes() {
    let (store, engine) = common::setup();
    let brand = common::brand();

    let mut session = store.begin().await.unwrap();
    engine
        .create_deposit(session.as_mut(), &brand, dec!(15000))
        .await
        .unwrap();
    session.rollback().await.unwrap();

    let session = store.begin().await.unwrap();
    assert!(session.payments_by_brand(brand.id).await.unwrap().is_empty());
    assert!(session.entries_by_user(brand.id).await.unwrap().is_empty());
    assert!(session.setting("platform_fee").await.unwrap().is_none());
}

/// Dropping a session without committing behaves like a rollback.
#[tokio::test]
async fn test_dropped_session_is_discarded() {
    let (store, engine) = common::setup();
    let brand = common::brand();

    {
        let mut session = store.begin().await.unwrap();
        engine
            .create_deposit(session.as_mut(), &brand, dec!(500))
            .await
            .unwrap();
    }

    let session = store.begin().await.unwrap();
    assert!(session.payments_by_brand(brand.id).await.unwrap().is_empty());
}

/// A failed release stages nothing the caller would want to keep: rolling
/// back after the error restores the pre-release state exactly.
#[tokio::test]
async fn test_rollback_after_failed_release_restores_state() {
    let (store, engine) = common::setup();
    let brand = common::brand();
    let creator = common::creator();

    let mut session = store.begin().await.unwrap();
    let payment = engine
        .create_deposit(session.as_mut(), &brand, dec!(1000))
        .await
        .unwrap();
    let release = engine
        .release_payment(session.as_mut(), payment.id, &creator, Uuid::new_v4())
        .await
        .unwrap();
    session.commit().await.unwrap();

    // Second release fails against the committed Released status.
    let mut session = store.begin().await.unwrap();
    let result = engine
        .release_payment(session.as_mut(), payment.id, &creator, Uuid::new_v4())
        .await;
    assert!(result.is_err());
    session.rollback().await.unwrap();

    let session = store.begin().await.unwrap();
    let stored = session.payment(payment.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::Released);
    let payouts = session.payouts_by_creator(creator.id).await.unwrap();
    assert_eq!(payouts, vec![release.payout]);
}

/// Writes in an open session are invisible to concurrently opened sessions
/// until commit.
#[tokio::test]
async fn test_staged_writes_are_isolated() {
    let (store, engine) = common::setup();
    let brand = common::brand();

    let mut writing = store.begin().await.unwrap();
    let payment = engine
        .create_deposit(writing.as_mut(), &brand, dec!(750))
        .await
        .unwrap();

    let reading = store.begin().await.unwrap();
    assert!(reading.payment(payment.id).await.unwrap().is_none());

    writing.commit().await.unwrap();
    let reading = store.begin().await.unwrap();
    assert!(reading.payment(payment.id).await.unwrap().is_some());
}
