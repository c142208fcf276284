use std::collections::BTreeMap;

use custody_common::{
    config::WalletConfig,
    error::{LedgerError, Result},
    Amount, Identity, TransferId,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::custody::{FundCustody, InMemoryCustody};
use crate::registry::MembershipRegistry;
use crate::transfer::TransferRequest;

/// Result of a successful `approve_transfer` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransferOutcome {
    /// Approval recorded, quorum not reached yet.
    Recorded { approvals: usize },
    /// This approval reached quorum and the funds were moved.
    Executed { approvals: usize },
}

/// Transfer ledger and approval engine.
///
/// Owns every transfer request, keyed by id, together with the id counter
/// and the custody backend. Calls take `&mut self`, so mutations are totally
/// ordered by whoever owns the engine and each one either commits fully or
/// leaves the engine untouched.
#[derive(Debug)]
pub struct ApprovalEngine<C: FundCustody = InMemoryCustody> {
    registry: MembershipRegistry,
    transfers: BTreeMap<TransferId, TransferRequest>,
    next_id: TransferId,
    custody: C,
}

impl ApprovalEngine<InMemoryCustody> {
    /// Deploys a wallet from its config and funds it with `initial_deposit`.
    pub fn from_config(config: &WalletConfig) -> Result<Self> {
        let registry = MembershipRegistry::new(config.approvers.clone(), config.quorum)?;
        let mut engine = Self::new(registry, InMemoryCustody::new());
        if config.initial_deposit > 0 {
            engine.deposit(config.initial_deposit)?;
        }
        Ok(engine)
    }
}

impl<C: FundCustody> ApprovalEngine<C> {
    pub fn new(registry: MembershipRegistry, custody: C) -> Self {
        info!(
            "🏛️ Custody wallet ready: {} approvers, quorum {}",
            registry.approvers().len(),
            registry.quorum()
        );
        Self {
            registry,
            transfers: BTreeMap::new(),
            next_id: 0,
            custody,
        }
    }

    /// Funds the pool. Anyone may deposit.
    ///
    /// # Errors
    /// [`LedgerError::InvalidAmount`] for a zero deposit, or
    /// [`LedgerError::Custody`] if the backend refuses it.
    pub fn deposit(&mut self, amount: Amount) -> Result<()> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        self.custody.deposit(amount)?;
        info!("💰 Deposited {} (pool: {})", amount, self.custody.balance());
        Ok(())
    }

    /// Creates a pending transfer request. No funds move and nothing is
    /// reserved at this point.
    ///
    /// # Errors
    /// - [`LedgerError::Unauthorized`] if `caller` is not an approver.
    /// - [`LedgerError::InvalidAmount`] if `amount` is zero.
    pub fn create_transfer(
        &mut self,
        caller: &Identity,
        amount: Amount,
        recipient: Identity,
    ) -> Result<TransferId> {
        self.ensure_approver(caller)?;
        if amount == 0 {
            warn!("❌ Rejected transfer from {}: zero amount", caller);
            return Err(LedgerError::InvalidAmount);
        }

        let id = self.next_id;
        info!("📝 Transfer #{} created by {}: {} -> {}", id, caller, amount, recipient);
        self.transfers.insert(id, TransferRequest::new(id, amount, recipient));
        self.next_id += 1;

        Ok(id)
    }

    /// Records `caller`'s approval of transfer `id` and executes the transfer
    /// when this approval is the quorum-th one.
    ///
    /// Checks run in this order and the first failure is reported:
    /// 1. [`LedgerError::Unauthorized`]
    /// 2. [`LedgerError::NotFound`]
    /// 3. [`LedgerError::AlreadySent`]
    /// 4. [`LedgerError::AlreadyApproved`]
    ///
    /// When quorum is reached the funds are moved before anything is
    /// committed; a custody failure is returned as [`LedgerError::Custody`]
    /// and the request keeps its previous approval count and `sent == false`.
    pub fn approve_transfer(&mut self, caller: &Identity, id: TransferId) -> Result<TransferOutcome> {
        self.ensure_approver(caller)?;
        let quorum = self.registry.quorum();

        let transfer = self.transfers.get_mut(&id).ok_or_else(|| {
            warn!("❌ Approval by {} for unknown transfer #{}", caller, id);
            LedgerError::NotFound(id)
        })?;

        if transfer.sent {
            warn!("❌ Transfer #{} already sent, approval by {} rejected", id, caller);
            return Err(LedgerError::AlreadySent);
        }
        if transfer.has_approved(caller) {
            warn!("❌ {} already approved transfer #{}", caller, id);
            return Err(LedgerError::AlreadyApproved);
        }

        let approvals = transfer.approvals + 1;
        if approvals < quorum {
            transfer.record_approval(caller.clone());
            info!("🗳️ Transfer #{}: {}/{} approvals (latest: {})", id, approvals, quorum, caller);
            return Ok(TransferOutcome::Recorded { approvals });
        }

        if let Err(e) = self.custody.move_funds(&transfer.recipient, transfer.amount) {
            warn!("❌ Transfer #{} reached quorum but fund movement failed: {}", id, e);
            return Err(e.into());
        }

        transfer.record_approval(caller.clone());
        transfer.mark_sent();
        info!(
            "✅ Transfer #{} executed: {} sent to {} ({}/{} approvals, pool: {})",
            id,
            transfer.amount,
            transfer.recipient,
            approvals,
            quorum,
            self.custody.balance()
        );

        Ok(TransferOutcome::Executed { approvals })
    }

    /// All transfer requests, pending and executed, in creation order.
    pub fn get_transfers(&self) -> Vec<TransferRequest> {
        self.transfers.values().cloned().collect()
    }

    pub fn get_transfer(&self, id: TransferId) -> Result<&TransferRequest> {
        self.transfers.get(&id).ok_or(LedgerError::NotFound(id))
    }

    pub fn pending_transfers(&self) -> Vec<TransferRequest> {
        self.transfers.values().filter(|t| !t.sent).cloned().collect()
    }

    pub fn approvers(&self) -> &[Identity] {
        self.registry.approvers()
    }

    pub fn quorum(&self) -> usize {
        self.registry.quorum()
    }

    pub fn is_approver(&self, identity: &Identity) -> bool {
        self.registry.is_approver(identity)
    }

    /// Current custodied balance.
    pub fn balance(&self) -> Amount {
        self.custody.balance()
    }

    pub fn custody(&self) -> &C {
        &self.custody
    }

    fn ensure_approver(&self, caller: &Identity) -> Result<()> {
        if !self.registry.is_approver(caller) {
            warn!("🚫 Unauthorized caller: {}", caller);
            return Err(LedgerError::Unauthorized);
        }
        debug!("caller {} is an approver", caller);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custody_common::error::CustodyError;

    fn engine(quorum: usize, pool: Amount) -> ApprovalEngine {
        let approvers = ["a", "b", "c", "d"].iter().map(|n| Identity::from(*n)).collect();
        let registry = MembershipRegistry::new(approvers, quorum).unwrap();
        ApprovalEngine::new(registry, InMemoryCustody::with_balance(pool))
    }

    /// Backend that refuses every disbursement.
    #[derive(Debug, Default)]
    struct FrozenCustody {
        pool: Amount,
    }

    impl FundCustody for FrozenCustody {
        fn balance(&self) -> Amount {
            self.pool
        }

        fn deposit(&mut self, amount: Amount) -> std::result::Result<(), CustodyError> {
            self.pool += amount;
            Ok(())
        }

        fn move_funds(&mut self, _: &Identity, _: Amount) -> std::result::Result<(), CustodyError> {
            Err(CustodyError::Rejected("custody frozen".to_string()))
        }
    }

    #[test]
    fn test_ids_are_sequential_from_zero() {
        let mut engine = engine(2, 1000);
        let a = Identity::from("a");

        assert_eq!(engine.create_transfer(&a, 10, "x".into()).unwrap(), 0);
        assert_eq!(engine.create_transfer(&a, 20, "y".into()).unwrap(), 1);
        assert_eq!(engine.create_transfer(&"b".into(), 30, "z".into()).unwrap(), 2);

        let ids: Vec<_> = engine.get_transfers().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_failed_create_does_not_consume_id() {
        let mut engine = engine(2, 1000);

        assert_eq!(
            engine.create_transfer(&"mallory".into(), 10, "x".into()),
            Err(LedgerError::Unauthorized)
        );
        assert_eq!(
            engine.create_transfer(&"a".into(), 0, "x".into()),
            Err(LedgerError::InvalidAmount)
        );
        assert_eq!(engine.create_transfer(&"a".into(), 10, "x".into()).unwrap(), 0);
    }

    #[test]
    fn test_unauthorized_checked_before_amount() {
        let mut engine = engine(2, 1000);
        assert_eq!(
            engine.create_transfer(&"mallory".into(), 0, "x".into()),
            Err(LedgerError::Unauthorized)
        );
    }

    #[test]
    fn test_precondition_order() {
        let mut engine = engine(1, 1000);
        let a = Identity::from("a");

        // Unauthorized wins over NotFound.
        assert_eq!(
            engine.approve_transfer(&"mallory".into(), 42),
            Err(LedgerError::Unauthorized)
        );
        assert_eq!(engine.approve_transfer(&a, 42), Err(LedgerError::NotFound(42)));

        let id = engine.create_transfer(&a, 100, "x".into()).unwrap();
        assert_eq!(
            engine.approve_transfer(&a, id),
            Ok(TransferOutcome::Executed { approvals: 1 })
        );

        // Sent wins over AlreadyApproved for the approver that executed it.
        assert_eq!(engine.approve_transfer(&a, id), Err(LedgerError::AlreadySent));
    }

    #[test]
    fn test_quorum_executes_exactly_once() {
        let mut engine = engine(2, 1000);
        let id = engine.create_transfer(&"a".into(), 300, "erin".into()).unwrap();

        assert_eq!(
            engine.approve_transfer(&"a".into(), id),
            Ok(TransferOutcome::Recorded { approvals: 1 })
        );
        assert_eq!(engine.balance(), 1000);

        assert_eq!(
            engine.approve_transfer(&"c".into(), id),
            Ok(TransferOutcome::Executed { approvals: 2 })
        );
        assert_eq!(engine.balance(), 700);
        assert_eq!(engine.custody().balance_of(&"erin".into()), 300);

        assert_eq!(engine.approve_transfer(&"d".into(), id), Err(LedgerError::AlreadySent));
        assert_eq!(engine.balance(), 700);
        assert_eq!(engine.get_transfer(id).unwrap().approvals, 2);
    }

    #[test]
    fn test_insufficient_funds_leaves_request_untouched() {
        let mut engine = engine(2, 100);
        let id = engine.create_transfer(&"a".into(), 500, "erin".into()).unwrap();
        engine.approve_transfer(&"a".into(), id).unwrap();

        let err = engine.approve_transfer(&"b".into(), id).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Custody(CustodyError::InsufficientFunds {
                available: 100,
                requested: 500
            })
        );

        let transfer = engine.get_transfer(id).unwrap();
        assert_eq!(transfer.approvals, 1);
        assert!(!transfer.sent);
        assert!(!transfer.has_approved(&"b".into()));
        assert_eq!(engine.balance(), 100);

        // Retry after funding succeeds.
        engine.deposit(400).unwrap();
        assert_eq!(
            engine.approve_transfer(&"b".into(), id),
            Ok(TransferOutcome::Executed { approvals: 2 })
        );
        assert_eq!(engine.balance(), 0);
    }

    #[test]
    fn test_custody_rejection_is_escalated() {
        let approvers = vec![Identity::from("a"), Identity::from("b")];
        let registry = MembershipRegistry::new(approvers, 1).unwrap();
        let mut engine = ApprovalEngine::new(registry, FrozenCustody { pool: 1000 });

        let id = engine.create_transfer(&"a".into(), 10, "erin".into()).unwrap();
        let err = engine.approve_transfer(&"b".into(), id).unwrap_err();

        assert!(matches!(err, LedgerError::Custody(CustodyError::Rejected(_))));
        let transfer = engine.get_transfer(id).unwrap();
        assert_eq!(transfer.approvals, 0);
        assert!(!transfer.sent);
        assert_eq!(engine.balance(), 1000);
    }

    #[test]
    fn test_pending_view() {
        let mut engine = engine(1, 1000);
        let first = engine.create_transfer(&"a".into(), 10, "x".into()).unwrap();
        engine.create_transfer(&"a".into(), 20, "y".into()).unwrap();
        engine.approve_transfer(&"b".into(), first).unwrap();

        let pending = engine.pending_transfers();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, 1);
        assert_eq!(engine.get_transfers().len(), 2);
    }

    #[test]
    fn test_zero_deposit_rejected() {
        let mut engine = engine(1, 0);
        assert_eq!(engine.deposit(0), Err(LedgerError::InvalidAmount));
        engine.deposit(5).unwrap();
        assert_eq!(engine.balance(), 5);
    }

    #[test]
    fn test_from_config_funds_pool() {
        let config = WalletConfig::new(vec!["a".into(), "b".into()], 2, 1000);
        let engine = ApprovalEngine::from_config(&config).unwrap();

        assert_eq!(engine.balance(), 1000);
        assert_eq!(engine.quorum(), 2);
        assert!(engine.is_approver(&"b".into()));
        assert!(engine.get_transfers().is_empty());
    }

    #[test]
    fn test_from_config_rejects_invalid_membership() {
        let config = WalletConfig::new(vec!["a".into()], 2, 1000);
        assert!(matches!(
            ApprovalEngine::from_config(&config),
            Err(LedgerError::InvalidConfiguration(_))
        ));
    }
}
