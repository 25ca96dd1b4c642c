//! Data models for the registry
//!
//! This module provides the records kept by the registry: data sources,
//! verifiers, and the aggregate statistics derived from them.

mod data_source;
mod verifier;

pub use data_source::{DataSourceRecord, VerificationStatus};
pub use verifier::VerifierRecord;

use serde::{Deserialize, Serialize};

/// Account identity (20-byte Ethereum-style address)
pub type Account = ethers::types::Address;

/// Token amount in the smallest ledger unit
pub type Amount = u128;

/// Aggregate statistics over the registry, taken from one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Number of registered data sources
    pub total_sources: usize,

    /// Number of verified data sources
    pub verified_sources: usize,

    /// Number of active verifiers
    pub verifier_count: usize,

    /// Sum of all rewards paid at verification
    pub total_rewards_paid: Amount,

    /// Number of ratings submitted across all data sources
    pub total_ratings: u64,
}

impl RegistryStats {
    /// Number of data sources still waiting for verification
    pub fn pending_sources(&self) -> usize {
        self.total_sources - self.verified_sources
    }
}
