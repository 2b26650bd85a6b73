//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `EscrowEngine` (deposit, release, withdraw and
//! bank-webhook operations), the fee registry and the read-only reporting
//! views. Everything here works against a caller-provided storage session
//! so that the caller decides when the unit of work commits or rolls back.

pub mod engine;
pub mod fees;
pub mod reports;
