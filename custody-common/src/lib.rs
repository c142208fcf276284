//! Types shared by the custody ledger and its tooling.
//!
//! Identities, amounts, the error signals surfaced to callers and the
//! wallet configuration file format all live here so that the ledger and
//! the CLI agree on them.

pub mod config;
pub mod error;
pub mod identity;

pub use identity::Identity;

/// Quantity of the single custodied asset.
pub type Amount = u128;

/// Sequential, zero-based identifier of a transfer request.
pub type TransferId = u64;
