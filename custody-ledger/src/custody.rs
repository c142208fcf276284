use std::collections::HashMap;

use custody_common::{error::CustodyError, Amount, Identity};
/// External collaborator that holds the pooled funds and disburses them.
///
/// Implementations must be all-or-nothing: when `move_funds` or `deposit`
/// returns an error, no balance anywhere may have changed.
pub trait FundCustody {
    /// Current custodied balance.
    fn balance(&self) -> Amount;

    /// Adds externally supplied value to the pool.
    fn deposit(&mut self, amount: Amount) -> Result<(), CustodyError>;

    /// Moves `amount` out of the pool to `recipient`.
    fn move_funds(&mut self, recipient: &Identity, amount: Amount) -> Result<(), CustodyError>;
}

/// In-process custody backend.
///
/// Tracks the pool and the balances credited to recipients, which is enough
/// to observe a disbursement from the outside.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustody {
    pool: Amount,
    accounts: HashMap<Identity, Amount>,
}

impl InMemoryCustody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(pool: Amount) -> Self {
        Self {
            pool,
            accounts: HashMap::new(),
        }
    }

    /// Funds credited to `identity` by executed transfers.
    pub fn balance_of(&self, identity: &Identity) -> Amount {
        *self.accounts.get(identity).unwrap_or(&0)
    }

    pub fn accounts(&self) -> &HashMap<Identity, Amount> {
        &self.accounts
    }
}

impl FundCustody for InMemoryCustody {
    fn balance(&self) -> Amount {
        self.pool
    }

    fn deposit(&mut self, amount: Amount) -> Result<(), CustodyError> {
        self.pool = self.pool.checked_add(amount).ok_or(CustodyError::Overflow)?;
        Ok(())
    }

    fn move_funds(&mut self, recipient: &Identity, amount: Amount) -> Result<(), CustodyError> {
        if self.pool < amount {
            return Err(CustodyError::InsufficientFunds {
                available: self.pool,
                requested: amount,
            });
        }

        let credited = self
            .balance_of(recipient)
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;

        // Both sides computed; nothing below can fail.
        self.pool -= amount;
        self.accounts.insert(recipient.clone(), credited);
        Ok(())
    }
}
