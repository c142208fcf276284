use thiserror::Error;

use crate::{Amount, TransferId};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Failure reasons surfaced to the caller of a ledger operation.
///
/// Every variant is a precondition violation detected before any state is
/// touched, so a failed call leaves the ledger exactly as it found it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The caller is not part of the approver set.
    #[error("Only Approvers allowed")]
    Unauthorized,

    /// No transfer request exists with the given id.
    #[error("Transfer {0} not found")]
    NotFound(TransferId),

    /// The transfer already reached quorum and was executed.
    #[error("Transaction has already been sent")]
    AlreadySent,

    /// The caller already approved this transfer.
    #[error("Transaction cannot be approved twice")]
    AlreadyApproved,

    /// Amounts must be strictly positive.
    #[error("Invalid amount: must be greater than zero")]
    InvalidAmount,

    /// Approver list or quorum violate `1 <= quorum <= len(approvers)` or contain duplicates.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The fund custody collaborator refused to move funds.
    #[error("Fund movement failed: {0}")]
    Custody(#[from] CustodyError),
}

/// Errors reported by a fund custody backend.
///
/// A backend returning any of these must not have changed a single balance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustodyError {
    #[error("Insufficient custodied balance: requested {requested}, available {available}")]
    InsufficientFunds { available: Amount, requested: Amount },

    #[error("Balance overflow")]
    Overflow,

    #[error("Fund movement rejected: {0}")]
    Rejected(String),
}
