use std::collections::HashSet;

use custody_common::{config::validate_membership, error::Result, Identity};

/// Fixed, ordered set of approvers plus the quorum threshold.
///
/// Built once; there is no add/remove/replace API.
#[derive(Debug, Clone)]
pub struct MembershipRegistry {
    approvers: Vec<Identity>,
    quorum: usize,
    members: HashSet<Identity>,
}

impl MembershipRegistry {
    /// Builds the registry.
    ///
    /// # Errors
    /// [`LedgerError::InvalidConfiguration`](custody_common::error::LedgerError::InvalidConfiguration)
    /// if the list is empty or has duplicates, or if `quorum` is 0 or larger
    /// than the number of approvers.
    pub fn new(approvers: Vec<Identity>, quorum: usize) -> Result<Self> {
        validate_membership(&approvers, quorum)?;

        let members = approvers.iter().cloned().collect();
        Ok(Self {
            approvers,
            quorum,
            members,
        })
    }

    pub fn is_approver(&self, identity: &Identity) -> bool {
        self.members.contains(identity)
    }

    /// Approvers in construction order.
    pub fn approvers(&self) -> &[Identity] {
        &self.approvers
    }

    pub fn quorum(&self) -> usize {
        self.quorum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custody_common::error::LedgerError;

    fn ids(names: &[&str]) -> Vec<Identity> {
        names.iter().map(|n| Identity::from(*n)).collect()
    }

    #[test]
    fn test_registry_keeps_order_and_quorum() {
        let registry = MembershipRegistry::new(ids(&["d", "a", "c", "b"]), 3).unwrap();

        assert_eq!(registry.approvers(), ids(&["d", "a", "c", "b"]).as_slice());
        assert_eq!(registry.quorum(), 3);
        assert!(registry.approvers().len() >= registry.quorum());
    }

    #[test]
    fn test_membership_check() {
        let registry = MembershipRegistry::new(ids(&["a", "b"]), 1).unwrap();

        assert!(registry.is_approver(&"a".into()));
        assert!(registry.is_approver(&"b".into()));
        assert!(!registry.is_approver(&"mallory".into()));
    }

    #[test]
    fn test_invalid_constructions() {
        for (approvers, quorum) in [(ids(&[]), 1), (ids(&["a"]), 0), (ids(&["a", "b"]), 3)] {
            let res = MembershipRegistry::new(approvers, quorum);
            assert!(matches!(res, Err(LedgerError::InvalidConfiguration(_))));
        }
    }

    #[test]
    fn test_duplicate_approver_rejected() {
        let res = MembershipRegistry::new(ids(&["a", "b", "b"]), 2);
        assert!(matches!(res, Err(LedgerError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_quorum_equal_to_size_is_valid() {
        let registry = MembershipRegistry::new(ids(&["a", "b", "c"]), 3).unwrap();
        assert_eq!(registry.quorum(), registry.approvers().len());
    }
}
