//! Domain entities, value objects and storage ports for the escrow ledger.

pub mod actor;
pub mod ledger;
pub mod money;
pub mod payment;
pub mod payout;
pub mod ports;
pub mod settings;
pub mod webhook;
