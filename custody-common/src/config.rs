use std::{collections::HashSet, fs, io, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::{Amount, Identity};

/// Deployment parameters of a custody wallet.
///
/// The approver list and quorum are fixed for the lifetime of the wallet;
/// `initial_deposit` is the amount the operator funds the pool with right
/// after deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    pub approvers: Vec<Identity>,
    pub quorum: usize,
    #[serde(default)]
    pub initial_deposit: Amount,
}

impl WalletConfig {
    pub fn new(approvers: Vec<Identity>, quorum: usize, initial_deposit: Amount) -> Self {
        Self {
            approvers,
            quorum,
            initial_deposit,
        }
    }

    /// Checks the approver set and quorum against the wallet invariants.
    ///
    /// # Errors
    /// Returns [`LedgerError::InvalidConfiguration`] when the approver list is
    /// empty or holds a duplicate identity, or when the quorum is zero or
    /// larger than the approver count.
    pub fn validate(&self) -> Result<()> {
        validate_membership(&self.approvers, self.quorum)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(path, json)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let data = fs::read_to_string(path)?;
        let parsed = serde_json::from_str::<WalletConfig>(&data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(parsed)
    }
}

/// Shared membership rules, used by the config loader and the registry.
pub fn validate_membership(approvers: &[Identity], quorum: usize) -> Result<()> {
    if approvers.is_empty() {
        return Err(LedgerError::InvalidConfiguration(
            "approver list is empty".to_string(),
        ));
    }
    if quorum == 0 {
        return Err(LedgerError::InvalidConfiguration(
            "quorum must be at least 1".to_string(),
        ));
    }
    if quorum > approvers.len() {
        return Err(LedgerError::InvalidConfiguration(format!(
            "quorum {} exceeds approver count {}",
            quorum,
            approvers.len()
        )));
    }

    let mut seen = HashSet::with_capacity(approvers.len());
    for approver in approvers {
        if !seen.insert(approver) {
            return Err(LedgerError::InvalidConfiguration(format!(
                "duplicate approver: {}",
                approver
            )));
        }
    }

    Ok(())
}
