//! Registry events and the append-only access log
//!
//! Every committed mutation, and every access report, is appended to the
//! [`EventLog`]. Entries are hash-chained: each entry commits to the hash of
//! its predecessor, so rewriting history breaks [`EventLog::verify_chain`].

use std::sync::{PoisonError, RwLock};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::crypto;
use crate::error::Result;
use crate::models::{Account, Amount};

/// An event emitted by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryEvent {
    /// A data source was registered
    Added {
        /// Content hash
        hash: String,
        /// Display name
        name: String,
        /// Submitting account
        owner: Account,
        /// Registration time
        timestamp: DateTime<Utc>,
    },

    /// A data source was verified
    Verified {
        /// Content hash
        hash: String,
        /// Verifying account
        verifier: Account,
        /// Verifier reputation after the verification
        reputation: u64,
        /// Verification time
        timestamp: DateTime<Utc>,
    },

    /// A data source was accessed
    Accessed {
        /// Content hash
        hash: String,
        /// Accessing account
        accessor: Account,
        /// Access time
        timestamp: DateTime<Utc>,
    },

    /// A verifier was registered
    VerifierAdded {
        /// Verifier account
        verifier: Account,
        /// Registration time
        timestamp: DateTime<Utc>,
    },

    /// A verification reward was paid
    Rewarded {
        /// Content hash of the verified data source
        hash: String,
        /// Account credited with the reward
        recipient: Account,
        /// Reward amount
        amount: Amount,
        /// Payment time
        timestamp: DateTime<Utc>,
    },

    /// A rating was submitted for a data source
    FeedbackProvided {
        /// Content hash
        hash: String,
        /// Rating account
        reviewer: Account,
        /// Submitted rating
        rating: u8,
        /// Average after the rating
        average: u64,
        /// Rating count after the rating
        count: u64,
        /// Submission time
        timestamp: DateTime<Utc>,
    },
}

impl RegistryEvent {
    /// Short event name
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryEvent::Added { .. } => "added",
            RegistryEvent::Verified { .. } => "verified",
            RegistryEvent::Accessed { .. } => "accessed",
            RegistryEvent::VerifierAdded { .. } => "verifier_added",
            RegistryEvent::Rewarded { .. } => "rewarded",
            RegistryEvent::FeedbackProvided { .. } => "feedback_provided",
        }
    }

    /// Time the event occurred
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            RegistryEvent::Added { timestamp, .. }
            | RegistryEvent::Verified { timestamp, .. }
            | RegistryEvent::Accessed { timestamp, .. }
            | RegistryEvent::VerifierAdded { timestamp, .. }
            | RegistryEvent::Rewarded { timestamp, .. }
            | RegistryEvent::FeedbackProvided { timestamp, .. } => *timestamp,
        }
    }
}

/// An event as stored in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Position in the log, starting at 1
    pub sequence: u64,

    /// Unique entry ID
    pub id: Uuid,

    /// The event
    pub event: RegistryEvent,

    /// Hash of the preceding entry, all zeros for the first
    pub previous_hash: [u8; 32],

    /// Hash of this entry
    pub entry_hash: [u8; 32],
}

impl LoggedEvent {
    /// Compute the chained hash of an entry
    pub fn calculate_hash(
        sequence: u64,
        id: &Uuid,
        event: &RegistryEvent,
        previous_hash: &[u8; 32],
    ) -> Result<[u8; 32]> {
        let encoded = serde_json::to_vec(event)?;
        Ok(crypto::secure_hash_multiple(
            crypto::EVENT_DOMAIN,
            &[previous_hash, &sequence.to_be_bytes(), id.as_bytes(), &encoded],
        ))
    }
}

/// Append-only, hash-chained event log
#[derive(Debug, Default)]
pub struct EventLog {
    entries: RwLock<Vec<LoggedEvent>>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, returning the stored entry
    pub fn append(&self, event: RegistryEvent) -> Result<LoggedEvent> {
        // A push either happens or it doesn't, so a poisoned log is still consistent
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        let sequence = entries.len() as u64 + 1;
        let previous_hash = entries.last().map_or([0u8; 32], |e| e.entry_hash);
        let id = Uuid::new_v4();
        let entry_hash = LoggedEvent::calculate_hash(sequence, &id, &event, &previous_hash)?;

        debug!("Event #{} {}", sequence, event.kind());

        let logged = LoggedEvent {
            sequence,
            id,
            event,
            previous_hash,
            entry_hash,
        };
        entries.push(logged.clone());

        Ok(logged)
    }

    /// All events in append order
    pub fn events(&self) -> Vec<LoggedEvent> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Events with a sequence number greater than `sequence`
    pub fn events_since(&self, sequence: u64) -> Vec<LoggedEvent> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let start = usize::try_from(sequence).unwrap_or(usize::MAX).min(entries.len());
        entries[start..].to_vec()
    }

    /// Number of events in the log
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hash of the latest entry, all zeros for an empty log
    pub fn latest_hash(&self) -> [u8; 32] {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .map_or([0u8; 32], |e| e.entry_hash)
    }

    /// Recompute the hash chain and check every link
    pub fn verify_chain(&self) -> Result<bool> {
        Self::verify_entries(&self.events())
    }

    /// Check the hash chain of an exported list of entries
    pub fn verify_entries(entries: &[LoggedEvent]) -> Result<bool> {
        let mut previous = [0u8; 32];

        for (position, entry) in entries.iter().enumerate() {
            if entry.sequence != position as u64 + 1 || entry.previous_hash != previous {
                return Ok(false);
            }

            let expected = LoggedEvent::calculate_hash(
                entry.sequence,
                &entry.id,
                &entry.event,
                &entry.previous_hash,
            )?;
            if expected != entry.entry_hash {
                return Ok(false);
            }

            previous = entry.entry_hash;
        }

        Ok(true)
    }
}
