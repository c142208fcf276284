use std::collections::HashSet;

use custody_common::{Amount, Identity, TransferId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    Pending,
    Sent,
}

/// One outbound payment, pending or executed.
///
/// `approved_by` is only used to reject a second approval from the same
/// approver and is not part of the serialized record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRequest {
    pub id: TransferId,
    pub amount: Amount,
    pub recipient: Identity,
    pub approvals: usize,
    pub sent: bool,
    #[serde(skip)]
    approved_by: HashSet<Identity>,
}

impl TransferRequest {
    pub(crate) fn new(id: TransferId, amount: Amount, recipient: Identity) -> Self {
        Self {
            id,
            amount,
            recipient,
            approvals: 0,
            sent: false,
            approved_by: HashSet::new(),
        }
    }

    pub fn has_approved(&self, approver: &Identity) -> bool {
        self.approved_by.contains(approver)
    }

    pub fn status(&self) -> TransferStatus {
        if self.sent {
            TransferStatus::Sent
        } else {
            TransferStatus::Pending
        }
    }

    /// Records a new distinct approval. Callers must have checked
    /// `has_approved` and `sent` first.
    pub(crate) fn record_approval(&mut self, approver: Identity) {
        if self.approved_by.insert(approver) {
            self.approvals += 1;
        }
    }

    pub(crate) fn mark_sent(&mut self) {
        self.sent = true;
    }
}
