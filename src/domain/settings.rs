use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Fallback applied when even the base `platform_fee` row is missing.
pub const DEFAULT_FEE_VALUE: Decimal = dec!(0.10);

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum FeeKey {
    PlatformFee,
    PlatformFeeDeposit,
    PlatformFeePayout,
}

impl FeeKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlatformFee => "platform_fee",
            Self::PlatformFeeDeposit => "platform_fee_deposit",
            Self::PlatformFeePayout => "platform_fee_payout",
        }
    }

    pub fn default_description(self) -> &'static str {
        match self {
            Self::PlatformFee => "Platform commission rate",
            Self::PlatformFeeDeposit => "Platform commission on deposits",
            Self::PlatformFeePayout => "Platform commission on payouts",
        }
    }
}

impl fmt::Display for FeeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "platform_fee" => Ok(Self::PlatformFee),
            "platform_fee_deposit" => Ok(Self::PlatformFeeDeposit),
            "platform_fee_payout" => Ok(Self::PlatformFeePayout),
            other => Err(format!("unknown fee key: {other}")),
        }
    }
}

/// A named decimal configuration row. Fee rates are stored with 4 decimal
/// places; `key` is unique in the backing store.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SystemSetting {
    pub id: Uuid,
    pub key: String,
    pub value: Decimal,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SystemSetting {
    pub fn new(key: impl Into<String>, value: Decimal, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            value,
            description: Some(description.into()),
            updated_at: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
