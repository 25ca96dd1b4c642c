//! Verifier record representation

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use super::Account;

/// An account authorized to verify data sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierRecord {
    /// Verifier account
    pub account: Account,

    /// Whether the verifier is active; never reverts once set
    pub active: bool,

    /// Reputation score; only ever increases
    pub reputation: u64,

    /// Number of successful verifications performed
    pub verification_count: u64,

    /// Registration time
    pub added_at: DateTime<Utc>,
}

impl VerifierRecord {
    /// Create a new active verifier with zero reputation
    pub fn new(account: Account, added_at: DateTime<Utc>) -> Self {
        VerifierRecord {
            account,
            active: true,
            reputation: 0,
            verification_count: 0,
            added_at,
        }
    }
}
