//! Data-source record representation
//!
//! A data source is identified by its content hash and moves through a
//! single one-way transition from unverified to verified.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::crypto;
use crate::rating::RatingStats;
use super::{Account, Amount};

/// Verification state of a data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    /// Submitted, awaiting a verifier
    Unverified,

    /// Verified and rewarded; terminal
    Verified,
}

/// A registered data source
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceRecord {
    /// Content hash identifying the data source
    pub hash: String,

    /// Display name
    pub name: String,

    /// Submitting account, set once at creation
    pub owner: Account,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Whether the data source has been verified
    pub verified: bool,

    /// Reward paid at verification, 0 until then
    pub reward: Amount,

    /// Verifier that performed the verification
    pub verified_by: Option<Account>,

    /// Verification time
    pub verified_at: Option<DateTime<Utc>>,

    /// Running rating statistics
    pub rating: RatingStats,
}

impl Debug for DataSourceRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DataSourceRecord")
            .field("hash", &self.hash)
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("verified", &self.verified)
            .field("reward", &self.reward)
            .field("rating", &self.rating)
            .finish()
    }
}

impl DataSourceRecord {
    /// Create a new, unverified record
    pub fn new(
        hash: impl Into<String>,
        name: impl Into<String>,
        owner: Account,
        created_at: DateTime<Utc>,
    ) -> Self {
        DataSourceRecord {
            hash: hash.into(),
            name: name.into(),
            owner,
            created_at,
            verified: false,
            reward: 0,
            verified_by: None,
            verified_at: None,
            rating: RatingStats::default(),
        }
    }

    /// Current verification state
    pub fn status(&self) -> VerificationStatus {
        if self.verified {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Unverified
        }
    }

    /// Apply the Unverified -> Verified transition.
    ///
    /// All verification fields are written together. Callers must have
    /// checked that the record is unverified.
    pub(crate) fn mark_verified(&mut self, reward: Amount, verifier: Account, at: DateTime<Utc>) {
        debug_assert!(!self.verified, "verification is one-shot");
        self.verified = true;
        self.reward = reward;
        self.verified_by = Some(verifier);
        self.verified_at = Some(at);
    }

    /// Hex-encoded digest over every field of the record
    pub fn digest(&self) -> String {
        let created = self.created_at.timestamp_millis().to_be_bytes();
        let verified = [self.verified as u8];
        let reward = self.reward.to_be_bytes();
        let verified_by = self.verified_by.unwrap_or_default();
        let verified_at = self
            .verified_at
            .map(|t| t.timestamp_millis())
            .unwrap_or(0)
            .to_be_bytes();
        let average = self.rating.average.to_be_bytes();
        let count = self.rating.count.to_be_bytes();

        let digest = crypto::secure_hash_multiple(
            crypto::DATA_SOURCE_DOMAIN,
            &[
                self.hash.as_bytes(),
                self.name.as_bytes(),
                self.owner.as_bytes(),
                &created,
                &verified,
                &reward,
                verified_by.as_bytes(),
                &verified_at,
                &average,
                &count,
            ],
        );

        hex::encode(digest)
    }
}
