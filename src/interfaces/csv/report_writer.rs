use crate::application::reports::{BrandBalance, CreatorPayouts};
use crate::domain::actor::Role;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// One output row of the scenario report. Amounts are preformatted to two
/// decimal places so the CSV is stable regardless of decimal scale.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct BalanceRow {
    pub user: String,
    pub role: Role,
    pub escrow: String,
    pub frozen: String,
    pub paid_out: String,
    pub released: String,
    pub withdrawn: String,
}

impl BalanceRow {
    pub fn new(
        user: impl Into<String>,
        role: Role,
        balance: &BrandBalance,
        payouts: &CreatorPayouts,
    ) -> Self {
        Self {
            user: user.into(),
            role,
            escrow: format!("{:.2}", balance.escrow_balance),
            frozen: format!("{:.2}", balance.frozen),
            paid_out: format!("{:.2}", balance.paid_out),
            released: format!("{:.2}", payouts.released),
            withdrawn: format!("{:.2}", payouts.withdrawn),
        }
    }
}

pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_rows(&mut self, rows: Vec<BalanceRow>) -> Result<()> {
        for row in rows {
            self.writer.serialize(row)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rows_are_formatted_to_two_places() {
        let balance = BrandBalance {
            escrow_balance: dec!(13500),
            frozen: dec!(13500),
            paid_out: dec!(0),
            fees_retained: dec!(1500),
        };
        let payouts = CreatorPayouts::default();
        let row = BalanceRow::new("brand1", Role::Brand, &balance, &payouts);
        assert_eq!(row.escrow, "13500.00");
        assert_eq!(row.withdrawn, "0.00");

        let mut writer = ReportWriter::new(Vec::new());
        writer.write_rows(vec![row]).unwrap();
        let output = String::from_utf8(writer.writer.into_inner().unwrap()).unwrap();
        assert!(output.starts_with("user,role,escrow,frozen,paid_out,released,withdrawn\n"));
        assert!(output.contains("brand1,brand,13500.00,13500.00,0.00,0.00,0.00"));
    }
}
