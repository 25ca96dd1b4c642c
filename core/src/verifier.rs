//! Verifier registry
//!
//! Maps accounts to verifier records and keeps them in registration order.
//! Registration needs an [`AdminCapability`]; reputation is only ever raised
//! by the data-source registry after a committed verification.

use std::collections::HashMap;
use chrono::{DateTime, Utc};

use crate::auth::AdminCapability;
use crate::error::{RegistryError, Result};
use crate::models::{Account, VerifierRecord};

/// Active verifiers and their reputation
#[derive(Debug, Clone, Default)]
pub struct VerifierRegistry {
    /// Verifier records by account
    records: HashMap<Account, VerifierRecord>,

    /// Accounts in registration order
    index: Vec<Account>,
}

impl VerifierRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `account` as an active verifier with zero reputation
    pub fn register(
        &mut self,
        account: Account,
        _capability: &AdminCapability,
        now: DateTime<Utc>,
    ) -> Result<&VerifierRecord> {
        if account.is_zero() {
            return Err(RegistryError::EmptyInput("verifier account".to_string()));
        }

        if self.is_active(&account) {
            return Err(RegistryError::AlreadyVerifier(account));
        }

        self.index.push(account);
        let record = self
            .records
            .entry(account)
            .or_insert_with(|| VerifierRecord::new(account, now));
        Ok(&*record)
    }

    /// Whether `account` is an active verifier
    pub fn is_active(&self, account: &Account) -> bool {
        self.records.get(account).map_or(false, |r| r.active)
    }

    /// Reputation of `account`; 0 if never registered
    pub fn reputation_of(&self, account: &Account) -> u64 {
        self.records.get(account).map_or(0, |r| r.reputation)
    }

    /// Verifier record for `account`
    pub fn get(&self, account: &Account) -> Option<&VerifierRecord> {
        self.records.get(account)
    }

    /// Verifier accounts in registration order
    pub fn accounts(&self) -> &[Account] {
        &self.index
    }

    /// Number of registered verifiers
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether no verifier has been registered
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Credit a successful verification to `account`.
    ///
    /// Returns the new reputation.
    pub(crate) fn bump_reputation(&mut self, account: &Account, delta: u64) -> Result<u64> {
        let record = self
            .records
            .get_mut(account)
            .filter(|r| r.active)
            .ok_or_else(|| RegistryError::NotFound(format!("verifier {:?}", account)))?;

        record.reputation = record.reputation.saturating_add(delta);
        record.verification_count += 1;
        Ok(record.reputation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AdminGate;

    fn setup() -> (VerifierRegistry, AdminCapability) {
        let admin = Account::from_low_u64_be(1);
        let capability = AdminGate::new(admin).authorize(admin).unwrap();
        (VerifierRegistry::new(), capability)
    }

    #[test]
    fn test_register_verifier() {
        let (mut verifiers, cap) = setup();
        let account = Account::from_low_u64_be(10);
        let now = Utc::now();

        let record = verifiers.register(account, &cap, now).unwrap();
        assert!(record.active);
        assert_eq!(record.reputation, 0);
        assert_eq!(record.added_at, now);

        assert!(verifiers.is_active(&account));
        assert_eq!(verifiers.accounts(), &[account]);
        assert_eq!(verifiers.len(), 1);
    }

    #[test]
    fn test_register_twice_fails() {
        let (mut verifiers, cap) = setup();
        let account = Account::from_low_u64_be(10);

        verifiers.register(account, &cap, Utc::now()).unwrap();
        let err = verifiers.register(account, &cap, Utc::now()).unwrap_err();

        assert!(matches!(err, RegistryError::AlreadyVerifier(a) if a == account));
        assert_eq!(verifiers.len(), 1);
    }

    #[test]
    fn test_zero_account_rejected() {
        let (mut verifiers, cap) = setup();

        let err = verifiers.register(Account::zero(), &cap, Utc::now()).unwrap_err();

        assert!(matches!(err, RegistryError::EmptyInput(_)));
        assert!(verifiers.is_empty());
    }

    #[test]
    fn test_unknown_account_has_zero_reputation() {
        let (verifiers, _) = setup();
        let stranger = Account::from_low_u64_be(99);

        assert!(!verifiers.is_active(&stranger));
        assert_eq!(verifiers.reputation_of(&stranger), 0);
        assert!(verifiers.get(&stranger).is_none());
    }

    #[test]
    fn test_bump_reputation() {
        let (mut verifiers, cap) = setup();
        let account = Account::from_low_u64_be(10);
        verifiers.register(account, &cap, Utc::now()).unwrap();

        assert_eq!(verifiers.bump_reputation(&account, 10).unwrap(), 10);
        assert_eq!(verifiers.bump_reputation(&account, 10).unwrap(), 20);
        assert_eq!(verifiers.reputation_of(&account), 20);
        assert_eq!(verifiers.get(&account).unwrap().verification_count, 2);

        let stranger = Account::from_low_u64_be(99);
        assert!(matches!(
            verifiers.bump_reputation(&stranger, 10),
            Err(RegistryError::NotFound(_))
        ));
    }
}
