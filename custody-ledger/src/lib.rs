//! Quorum-gated custodial ledger.
//!
//! A fixed set of approvers jointly controls a pool of funds. Any outbound
//! transfer is first recorded as a pending request and only executes once
//! `quorum` distinct approvers have approved it.

pub mod custody;
pub mod engine;
pub mod registry;
pub mod transfer;

pub use custody::{FundCustody, InMemoryCustody};
pub use engine::{ApprovalEngine, TransferOutcome};
pub use registry::MembershipRegistry;
pub use transfer::{TransferRequest, TransferStatus};

pub use custody_common::{
    error::{CustodyError, LedgerError, Result},
    Amount, Identity, TransferId,
};
