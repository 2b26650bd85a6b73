//! Read-only aggregation views consumed by dashboards.
//!
//! These mirror the status semantics of the escrow state machine: "escrow
//! balance" is everything not yet fully paid out, "frozen" is everything
//! still awaiting bank confirmation or release.

use crate::domain::ledger::LedgerEntry;
use crate::domain::payment::PaymentStatus;
use crate::domain::payout::PayoutStatus;
use crate::domain::ports::EscrowSession;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct BrandBalance {
    /// Sum of payments in `Hold`, `Reserved` or `Released`.
    pub escrow_balance: Decimal,
    /// Sum of payments in `Hold` or `Reserved` only.
    pub frozen: Decimal,
    /// Sum of payments fully paid out to creators.
    pub paid_out: Decimal,
    /// Deposit and release fees retained across all of the brand's payments.
    pub fees_retained: Decimal,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CreatorPayouts {
    pub pending: Decimal,
    pub released: Decimal,
    pub withdrawn: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentTotal {
    pub status: PaymentStatus,
    pub count: usize,
    pub total: Decimal,
}

/// Balance view for a single brand.
pub async fn brand_balance(session: &dyn EscrowSession, brand_id: Uuid) -> Result<BrandBalance> {
    let mut report = BrandBalance::default();
    for payment in session.payments_by_brand(brand_id).await? {
        if payment.status.in_escrow() {
            report.escrow_balance += payment.amount;
        }
        if payment.status.is_frozen() {
            report.frozen += payment.amount;
        }
        if payment.status == PaymentStatus::Paid {
            report.paid_out += payment.amount;
        }
        report.fees_retained += payment.deposit_fee + payment.fee;
    }
    Ok(report)
}

/// Payout totals by status for a single creator.
pub async fn creator_payouts(
    session: &dyn EscrowSession,
    creator_id: Uuid,
) -> Result<CreatorPayouts> {
    let mut report = CreatorPayouts::default();
    for payout in session.payouts_by_creator(creator_id).await? {
        match payout.status {
            PayoutStatus::Pending => report.pending += payout.amount,
            PayoutStatus::Released => report.released += payout.amount,
            PayoutStatus::Withdrawn => report.withdrawn += payout.amount,
        }
        report.total += payout.amount;
    }
    Ok(report)
}

/// Platform-wide payment counts and sums per status, for the admin finance
/// rollup. Statuses with no payments are omitted.
pub async fn payment_totals(session: &dyn EscrowSession) -> Result<Vec<PaymentTotal>> {
    const STATUSES: [PaymentStatus; 5] = [
        PaymentStatus::Hold,
        PaymentStatus::Reserved,
        PaymentStatus::Released,
        PaymentStatus::Paid,
        PaymentStatus::Refunded,
    ];

    let payments = session.all_payments().await?;
    let mut totals = Vec::new();
    for status in STATUSES {
        let matching = payments.iter().filter(|p| p.status == status);
        let (count, total) = matching.fold((0usize, Decimal::ZERO), |(count, sum), payment| {
            (count + 1, sum + payment.amount)
        });
        if count > 0 {
            totals.push(PaymentTotal {
                status,
                count,
                total,
            });
        }
    }
    Ok(totals)
}

/// A user's full transaction history, oldest first.
pub async fn ledger_history(
    session: &dyn EscrowSession,
    user_id: Uuid,
) -> Result<Vec<LedgerEntry>> {
    let mut entries = session.entries_by_user(user_id).await?;
    entries.sort_by_key(|entry| entry.created_at);
    Ok(entries)
}
