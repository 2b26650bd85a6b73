use crate::application::fees;
use crate::domain::actor::Actor;
use crate::domain::ledger::{EntryKind, LedgerEntry, ReferenceKind};
use crate::domain::money::round_money;
use crate::domain::payment::{Payment, PaymentStatus};
use crate::domain::payout::{Payout, PayoutStatus};
use crate::domain::ports::EscrowSession;
use crate::domain::webhook::{BankAck, BankEvent, DEPOSIT_CONFIRMED, PAYOUT_PAID};
use crate::error::{EscrowError, Result};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Everything a release produces, returned as one tuple-like value for the
/// API layer to serialize.
#[derive(Debug, Clone, PartialEq)]
pub struct Release {
    pub payment: Payment,
    pub payout: Payout,
    pub fee: Decimal,
    pub payout_amount: Decimal,
    pub payout_rate: Decimal,
}

/// The escrow state machine: deposits into custody, releases to creators,
/// creator withdrawals and asynchronous bank confirmations.
///
/// The engine is stateless. Every operation takes a caller-provided session
/// and stages all of its writes there; a failure partway leaves nothing
/// behind once the caller rolls the session back. Role and campaign
/// validation belong to the API layer; the engine re-checks only payout
/// ownership and the status guards that make each transition at-most-once.
#[derive(Default)]
pub struct EscrowEngine;

impl EscrowEngine {
    pub fn new() -> Self {
        Self
    }

    /// Places brand funds in custody.
    ///
    /// The requested gross amount is quantized to 2 decimal places and must
    /// be strictly positive. The deposit fee is retained up front; the
    /// payment holds the net amount in `Hold` until the bank confirms.
    pub async fn create_deposit(
        &self,
        session: &mut dyn EscrowSession,
        brand: &Actor,
        requested: Decimal,
    ) -> Result<Payment> {
        let requested = round_money(requested);
        if requested <= Decimal::ZERO {
            return Err(EscrowError::Rejected(
                "Deposit amount must be positive".to_string(),
            ));
        }

        let deposit_rate = fees::deposit_fee_rate(session).await?;
        let payout_rate = fees::payout_fee_rate(session).await?;
        let deposit_fee = round_money(requested * deposit_rate);
        let net_amount = round_money(requested - deposit_fee);
        if net_amount <= Decimal::ZERO {
            return Err(EscrowError::Rejected(
                "Deposit amount is fully consumed by commissions".to_string(),
            ));
        }

        let payment = Payment::hold(brand.id, net_amount, deposit_fee);
        session.insert_payment(payment.clone()).await?;

        session
            .append_entry(
                LedgerEntry::new(brand.id, EntryKind::Deposit, requested)
                    .with_reference(ReferenceKind::Payment, payment.id)
                    .with_description(format!("Deposit initiated by {}", brand.email)),
            )
            .await?;
        if deposit_fee > Decimal::ZERO {
            session
                .append_entry(
                    LedgerEntry::new(brand.id, EntryKind::Fee, deposit_fee)
                        .with_reference(ReferenceKind::Payment, payment.id)
                        .with_description(format!(
                            "Deposit fee retained for payment {}",
                            payment.id
                        )),
                )
                .await?;
        }

        tracing::info!(
            target: "payments",
            brand = %brand.id,
            deposit = %requested,
            deposit_rate = %deposit_rate,
            payout_rate = %payout_rate,
            "deposit held in escrow"
        );
        tracing::info!(
            target: "bank",
            event = "deposit_hold",
            payment = %payment.id,
            amount = %requested,
            deposit_fee = %deposit_fee,
            "bank notified"
        );
        Ok(payment)
    }

    /// Releases an escrowed payment to a creator.
    ///
    /// Only `Hold` or `Reserved` payments qualify, which also makes this
    /// operation at-most-once per payment: a second call sees `Released`
    /// and fails cleanly. This is the sole producer of payout rows.
    pub async fn release_payment(
        &self,
        session: &mut dyn EscrowSession,
        payment_id: Uuid,
        creator: &Actor,
        campaign_id: Uuid,
    ) -> Result<Release> {
        let mut payment = session
            .payment(payment_id)
            .await?
            .ok_or_else(|| EscrowError::Rejected("Payment not found".to_string()))?;
        if !payment.status.is_releasable() {
            return Err(EscrowError::Rejected(
                "Payment is not available for release".to_string(),
            ));
        }

        let payout_rate = fees::payout_fee_rate(session).await?;
        let fee = round_money(payment.amount * payout_rate);
        // No floor check here: set_fee keeps rates below 1, so the payout
        // can round to zero but never go negative in practice.
        let payout_amount = round_money(payment.amount - fee);

        payment.status = PaymentStatus::Released;
        payment.fee = fee;
        payment.touch();
        session.update_payment(payment.clone()).await?;

        let payout = Payout::released(creator.id, campaign_id, payment.id, payout_amount);
        session.insert_payout(payout.clone()).await?;

        session
            .append_entry(
                LedgerEntry::new(payment.brand_id, EntryKind::Release, payout_amount)
                    .with_reference(ReferenceKind::Payment, payment.id)
                    .with_description(format!("Payout released to {}", creator.email)),
            )
            .await?;
        session
            .append_entry(
                LedgerEntry::new(payment.brand_id, EntryKind::Fee, fee)
                    .with_reference(ReferenceKind::Payment, payment.id)
                    .with_description(format!("Platform fee retained for payment {}", payment.id)),
            )
            .await?;

        tracing::info!(
            target: "payments",
            payout_rate = %payout_rate,
            fee = %fee,
            payout = %payout_amount,
            "payout fee applied"
        );
        tracing::info!(
            target: "payments",
            creator = %creator.id,
            amount = %payout_amount,
            status = ?payout.status,
            "payout released"
        );
        tracing::info!(
            target: "bank",
            event = "payout_released",
            payment = %payment.id,
            payout = %payout.id,
            "bank notified"
        );

        Ok(Release {
            payment,
            payout,
            fee,
            payout_amount,
            payout_rate,
        })
    }

    /// Marks a payout as withdrawn by its creator.
    ///
    /// Ownership is re-checked here even though the API layer already did:
    /// this is the one invariant the engine refuses to take on trust. Any
    /// non-withdrawn status is accepted.
    pub async fn withdraw_payout(
        &self,
        session: &mut dyn EscrowSession,
        payout_id: Uuid,
        actor: &Actor,
    ) -> Result<Payout> {
        let mut payout = session
            .payout(payout_id)
            .await?
            .ok_or_else(|| EscrowError::Rejected("Payout not found".to_string()))?;
        if payout.creator_id != actor.id {
            return Err(EscrowError::Forbidden(
                "Cannot withdraw someone else's payout".to_string(),
            ));
        }
        if payout.status == PayoutStatus::Withdrawn {
            return Err(EscrowError::Rejected("Payout already withdrawn".to_string()));
        }

        payout.status = PayoutStatus::Withdrawn;
        payout.touch();
        session.update_payout(payout.clone()).await?;

        session
            .append_entry(
                LedgerEntry::new(payout.creator_id, EntryKind::Withdraw, payout.amount)
                    .with_reference(ReferenceKind::Payout, payout.id)
                    .with_description(format!("Payout withdrawn by {}", actor.email)),
            )
            .await?;

        if let Some(payment_id) = payout.payment_id
            && let Some(mut payment) = session.payment(payment_id).await?
        {
            payment.status = PaymentStatus::Paid;
            payment.touch();
            session.update_payment(payment).await?;
        }

        tracing::info!(
            target: "payments",
            creator = %actor.id,
            amount = %payout.amount,
            status = ?payout.status,
            "payout withdrawn"
        );
        tracing::info!(
            target: "bank",
            event = "withdraw_processed",
            payout = %payout.id,
            amount = %payout.amount,
            "bank notified"
        );
        Ok(payout)
    }

    /// Applies an asynchronous bank event.
    ///
    /// This handler never raises for business reasons: missing ids, unknown
    /// rows, wrong states and unrecognized event names are all logged and
    /// acknowledged so the external sender never sees a failure for a
    /// retried or stale delivery.
    pub async fn handle_bank_webhook(
        &self,
        session: &mut dyn EscrowSession,
        event: &BankEvent,
    ) -> Result<BankAck> {
        tracing::info!(
            target: "bank",
            event = %event.event,
            payload = %serde_json::to_string(event).unwrap_or_default(),
            "bank event received"
        );

        match event.event.as_str() {
            DEPOSIT_CONFIRMED => {
                if let Some(payment_id) = event.payment_id
                    && let Some(mut payment) = session.payment(payment_id).await?
                    && payment.status == PaymentStatus::Hold
                {
                    payment.status = PaymentStatus::Reserved;
                    payment.touch();
                    session.update_payment(payment.clone()).await?;
                    tracing::info!(
                        target: "payments",
                        payment = %payment.id,
                        status = ?payment.status,
                        "bank confirmed deposit"
                    );
                }
            }
            PAYOUT_PAID => {
                if let Some(payout_id) = event.payout_id
                    && let Some(mut payout) = session.payout(payout_id).await?
                    && payout.status != PayoutStatus::Withdrawn
                {
                    payout.status = PayoutStatus::Withdrawn;
                    payout.touch();
                    if let Some(payment_id) = payout.payment_id
                        && let Some(mut payment) = session.payment(payment_id).await?
                    {
                        payment.status = PaymentStatus::Paid;
                        payment.touch();
                        session.update_payment(payment).await?;
                    }
                    session.update_payout(payout.clone()).await?;
                    tracing::info!(
                        target: "payments",
                        payout = %payout.id,
                        status = ?payout.status,
                        "bank marked payout paid"
                    );
                }
            }
            _ => {}
        }
        Ok(BankAck::accepted(&event.event))
    }
}
