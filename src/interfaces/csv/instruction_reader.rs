use crate::error::EscrowError;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum InstructionKind {
    Deposit,
    Confirm,
    Release,
    Withdraw,
    PayoutPaid,
    SetFee,
}

/// One scenario row. Labels (`actor`, `payment`, `payout`, `campaign`) are
/// free-form names that the scenario runner maps to generated ids.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Instruction {
    pub op: InstructionKind,
    pub actor: Option<String>,
    pub amount: Option<Decimal>,
    pub payment: Option<String>,
    pub payout: Option<String>,
    pub campaign: Option<String>,
    pub fee_key: Option<String>,
}

pub struct InstructionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> InstructionReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn instructions(self) -> impl Iterator<Item = Result<Instruction, EscrowError>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(EscrowError::from))
    }
}
