mod common;

use escrow_ledger::domain::payout::{Payout, PayoutStatus};
use escrow_ledger::domain::ports::EscrowStore;
use escrow_ledger::error::EscrowError;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Ownership is enforced inside the engine, not just at the API edge: even
/// a payout row planted directly in the store cannot be withdrawn by
/// someone else.
#[tokio::test]
async fn test_withdraw_rechecks_ownership_on_raw_rows() {
    let (store, engine) = common::setup();
    let owner = common::creator();
    let stranger = common::creator();

    let payout = Payout::released(owner.id, Uuid::new_v4(), Uuid::new_v4(), dec!(500));
    let mut session = store.begin().await.unwrap();
    session.insert_payout(payout.clone()).await.unwrap();
    session.commit().await.unwrap();

    let mut session = store.begin().await.unwrap();
    let result = engine
        .withdraw_payout(session.as_mut(), payout.id, &stranger)
        .await;
    assert!(matches!(result, Err(EscrowError::Forbidden(_))));
    session.rollback().await.unwrap();

    // The owner can still withdraw it.
    let mut session = store.begin().await.unwrap();
    let withdrawn = engine
        .withdraw_payout(session.as_mut(), payout.id, &owner)
        .await
        .unwrap();
    assert_eq!(withdrawn.status, PayoutStatus::Withdrawn);
    session.commit().await.unwrap();
}

/// The forbidden attempt leaves no ledger entry for either party.
#[tokio::test]
async fn test_forbidden_withdraw_writes_nothing() {
    let (store, engine) = common::setup();
    let owner = common::creator();
    let stranger = common::creator();

    let payout = Payout::released(owner.id, Uuid::new_v4(), Uuid::new_v4(), dec!(500));
    let mut session = store.begin().await.unwrap();
    session.insert_payout(payout.clone()).await.unwrap();
    session.commit().await.unwrap();

    let mut session = store.begin().await.unwrap();
    let _ = engine
        .withdraw_payout(session.as_mut(), payout.id, &stranger)
        .await;
    session.rollback().await.unwrap();

    let session = store.begin().await.unwrap();
    assert!(session.entries_by_user(owner.id).await.unwrap().is_empty());
    assert!(session.entries_by_user(stranger.id).await.unwrap().is_empty());
    let stored = session.payout(payout.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PayoutStatus::Released);
}

/// Withdrawing a payout that does not exist is rejected, not forbidden.
#[tokio::test]
async fn test_withdraw_unknown_payout_is_rejected() {
    let (store, engine) = common::setup();
    let creator = common::creator();

    let mut session = store.begin().await.unwrap();
    let result = engine
        .withdraw_payout(session.as_mut(), Uuid::new_v4(), &creator)
        .await;
    assert!(matches!(result, Err(EscrowError::Rejected(_))));
}
