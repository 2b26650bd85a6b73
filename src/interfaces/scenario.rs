//! Replays an escrow scenario from instruction rows against a store.
//!
//! The runner stands in for the API layer: it resolves labels to actors and
//! entity ids, opens one session per instruction, and commits on success or
//! rolls back on failure — exactly the transaction scope the engine expects
//! from its caller.

use crate::application::engine::EscrowEngine;
use crate::application::{fees, reports};
use crate::domain::actor::{Actor, Role};
use crate::domain::ports::{EscrowSession, EscrowStoreBox};
use crate::domain::settings::FeeKey;
use crate::domain::webhook::BankEvent;
use crate::error::{EscrowError, Result};
use crate::interfaces::csv::instruction_reader::{Instruction, InstructionKind};
use crate::interfaces::csv::report_writer::BalanceRow;
use std::collections::HashMap;
use uuid::Uuid;

pub struct ScenarioRunner {
    store: EscrowStoreBox,
    engine: EscrowEngine,
    users: Vec<(String, Actor)>,
    payments: HashMap<String, Uuid>,
    payouts: HashMap<String, Uuid>,
    campaigns: HashMap<String, Uuid>,
}

impl ScenarioRunner {
    pub fn new(store: EscrowStoreBox) -> Self {
        Self {
            store,
            engine: EscrowEngine::new(),
            users: Vec::new(),
            payments: HashMap::new(),
            payouts: HashMap::new(),
            campaigns: HashMap::new(),
        }
    }

    /// Applies one instruction inside its own session.
    pub async fn apply(&mut self, instruction: Instruction) -> Result<()> {
        let mut session = self.store.begin().await?;
        match self.execute(session.as_mut(), &instruction).await {
            Ok(()) => session.commit().await,
            Err(error) => {
                session.rollback().await?;
                Err(error)
            }
        }
    }

    async fn execute(
        &mut self,
        session: &mut dyn EscrowSession,
        instruction: &Instruction,
    ) -> Result<()> {
        match instruction.op {
            InstructionKind::Deposit => {
                let brand = self.actor(required(&instruction.actor, "actor")?, Role::Brand);
                let amount = instruction.amount.ok_or_else(|| {
                    EscrowError::Rejected("deposit requires an amount".to_string())
                })?;
                let payment = self.engine.create_deposit(session, &brand, amount).await?;
                if let Some(label) = &instruction.payment {
                    self.payments.insert(label.clone(), payment.id);
                }
                Ok(())
            }
            InstructionKind::Confirm => {
                let payment_id = self.payment_id(required(&instruction.payment, "payment")?)?;
                self.engine
                    .handle_bank_webhook(session, &BankEvent::deposit_confirmed(payment_id))
                    .await?;
                Ok(())
            }
            InstructionKind::Release => {
                let creator = self.actor(required(&instruction.actor, "actor")?, Role::Creator);
                let payment_id = self.payment_id(required(&instruction.payment, "payment")?)?;
                let campaign_id = self.campaign_id(required(&instruction.campaign, "campaign")?);
                let release = self
                    .engine
                    .release_payment(session, payment_id, &creator, campaign_id)
                    .await?;
                if let Some(label) = &instruction.payout {
                    self.payouts.insert(label.clone(), release.payout.id);
                }
                Ok(())
            }
            InstructionKind::Withdraw => {
                let creator = self.actor(required(&instruction.actor, "actor")?, Role::Creator);
                let payout_id = self.payout_id(required(&instruction.payout, "payout")?)?;
                self.engine
                    .withdraw_payout(session, payout_id, &creator)
                    .await?;
                Ok(())
            }
            InstructionKind::PayoutPaid => {
                let payout_id = self.payout_id(required(&instruction.payout, "payout")?)?;
                self.engine
                    .handle_bank_webhook(session, &BankEvent::payout_paid(payout_id))
                    .await?;
                Ok(())
            }
            InstructionKind::SetFee => {
                let key: FeeKey = required(&instruction.fee_key, "fee_key")?
                    .parse()
                    .map_err(EscrowError::Rejected)?;
                let value = instruction.amount.ok_or_else(|| {
                    EscrowError::Rejected("set-fee requires an amount".to_string())
                })?;
                let admin = instruction
                    .actor
                    .as_deref()
                    .map(|label| self.actor(label, Role::Admin));
                fees::set_fee(session, key, value, admin.as_ref()).await?;
                Ok(())
            }
        }
    }

    /// Final balances for every user the scenario touched, in first-seen
    /// order.
    pub async fn balances(&self) -> Result<Vec<BalanceRow>> {
        let session = self.store.begin().await?;
        let mut rows = Vec::new();
        for (label, actor) in &self.users {
            let balance = reports::brand_balance(session.as_ref(), actor.id).await?;
            let payouts = reports::creator_payouts(session.as_ref(), actor.id).await?;
            rows.push(BalanceRow::new(label.clone(), actor.role, &balance, &payouts));
        }
        Ok(rows)
    }

    // Label-derived ids so that a persistent store attributes rows to the
    // same user across runs.
    fn actor(&mut self, label: &str, role: Role) -> Actor {
        if let Some((_, actor)) = self.users.iter().find(|(l, _)| l == label) {
            return actor.clone();
        }
        let actor = Actor {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, label.as_bytes()),
            email: format!("{label}@example.com"),
            role,
        };
        self.users.push((label.to_string(), actor.clone()));
        actor
    }

    fn payment_id(&self, label: &str) -> Result<Uuid> {
        self.payments
            .get(label)
            .copied()
            .ok_or_else(|| EscrowError::Rejected(format!("unknown payment label: {label}")))
    }

    fn payout_id(&self, label: &str) -> Result<Uuid> {
        self.payouts
            .get(label)
            .copied()
            .ok_or_else(|| EscrowError::Rejected(format!("unknown payout label: {label}")))
    }

    fn campaign_id(&mut self, label: &str) -> Uuid {
        *self
            .campaigns
            .entry(label.to_string())
            .or_insert_with(Uuid::new_v4)
    }
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str> {
    field
        .as_deref()
        .ok_or_else(|| EscrowError::Rejected(format!("instruction requires a {name}")))
}
