//! Fungible balance ledger
//!
//! The registry pays rewards through the [`Ledger`] trait and makes no other
//! assumption about where balances live. [`InMemoryLedger`] is a reference
//! implementation with conserved supply and atomic transfers.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use log::{debug, warn};
use thiserror::Error;

use crate::models::{Account, Amount};

/// Ledger error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Sender balance is lower than the transfer amount
    #[error("Insufficient funds: {account:?} holds {balance}, needs {required}")]
    InsufficientFunds {
        /// Debited account
        account: Account,
        /// Balance at the time of the transfer
        balance: Amount,
        /// Requested amount
        required: Amount,
    },

    /// Minting would overflow the total supply
    #[error("Minting would overflow the total supply")]
    SupplyOverflow,
}

/// Result type for ledger operations
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Balance store used to pay rewards.
///
/// Implementations must keep the sum of all balances equal to the minted
/// supply and apply a transfer's debit and credit together or not at all.
#[cfg_attr(test, mockall::automock)]
pub trait Ledger: Send + Sync {
    /// Move `amount` from `from` to `to`
    fn transfer(&self, from: Account, to: Account, amount: Amount) -> LedgerResult<()>;

    /// Create `amount` new tokens in `to`
    fn mint(&self, to: Account, amount: Amount) -> LedgerResult<()>;

    /// Current balance of `account`
    fn balance_of(&self, account: Account) -> Amount;
}

#[derive(Debug, Default)]
struct Balances {
    accounts: HashMap<Account, Amount>,
    total_supply: Amount,
}

/// Thread-safe in-memory ledger
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    inner: RwLock<Balances>,
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger with initial balances minted to the given accounts
    pub fn with_balances(balances: impl IntoIterator<Item = (Account, Amount)>) -> LedgerResult<Self> {
        let ledger = Self::new();
        for (account, amount) in balances {
            ledger.mint(account, amount)?;
        }
        Ok(ledger)
    }

    /// Total minted supply
    pub fn total_supply(&self) -> Amount {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).total_supply
    }

    /// Sum of every account balance; equals [`total_supply`](Self::total_supply)
    pub fn sum_of_balances(&self) -> Amount {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .accounts
            .values()
            .sum()
    }
}

// Every operation validates before it mutates, under one write lock.
impl Ledger for InMemoryLedger {
    fn transfer(&self, from: Account, to: Account, amount: Amount) -> LedgerResult<()> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let balance = inner.accounts.get(&from).copied().unwrap_or(0);
        if balance < amount {
            warn!(
                "Transfer of {} from {:?} rejected: balance {}",
                amount, from, balance
            );
            return Err(LedgerError::InsufficientFunds {
                account: from,
                balance,
                required: amount,
            });
        }

        if from != to {
            inner.accounts.insert(from, balance - amount);
            // Cannot overflow: the credit is bounded by the total supply
            *inner.accounts.entry(to).or_insert(0) += amount;
        }

        debug!("Transferred {} from {:?} to {:?}", amount, from, to);
        Ok(())
    }

    fn mint(&self, to: Account, amount: Amount) -> LedgerResult<()> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let total_supply = inner
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;

        inner.total_supply = total_supply;
        *inner.accounts.entry(to).or_insert(0) += amount;

        debug!("Minted {} to {:?}", amount, to);
        Ok(())
    }

    fn balance_of(&self, account: Account) -> Amount {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .accounts
            .get(&account)
            .copied()
            .unwrap_or(0)
    }
}
