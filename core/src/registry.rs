//! Data-source registry
//!
//! The registry owns every data-source record and the verifier registry, and
//! pays verification rewards through the injected [`Ledger`].
//!
//! All state sits behind one lock. Mutations hold the write lock for their
//! whole duration, so they are applied in a single global order; in
//! particular `verify` holds it across the ledger transfer, which makes the
//! transfer and the registry commit one unit and rules out two verifications
//! of the same record racing each other. Reads hold the read lock and return
//! cloned snapshots.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::auth::AdminGate;
use crate::config::RegistryConfig;
use crate::error::{to_state_error, RegistryError, Result};
use crate::events::{EventLog, RegistryEvent};
use crate::ledger::Ledger;
use crate::models::{Account, Amount, DataSourceRecord, RegistryStats, VerifierRecord};
use crate::rating::{Rating, RatingStats};
use crate::reward::RewardPolicy;
use crate::utils::OperationTimer;
use crate::verifier::VerifierRegistry;

/// State guarded by the registry lock
#[derive(Debug, Default)]
struct RegistryState {
    /// Records by content hash
    sources: HashMap<String, DataSourceRecord>,

    /// Content hashes in insertion order
    hash_index: Vec<String>,

    /// Verifier registry
    verifiers: VerifierRegistry,
}

/// Registry of data sources, verifiers and verification rewards
#[derive(Debug)]
pub struct DataSourceRegistry<L: Ledger> {
    state: RwLock<RegistryState>,
    ledger: L,
    gate: AdminGate,
    treasury: Account,
    policy: RewardPolicy,
    reputation_increment: u64,
    slow_threshold: Duration,
    events: EventLog,
}

impl<L: Ledger> DataSourceRegistry<L> {
    /// Create a registry paying rewards through `ledger`
    pub fn new(config: RegistryConfig, ledger: L) -> Result<Self> {
        config.validate()?;

        let treasury = config.treasury_account();
        info!(
            "Data source registry initialized (admin={:?}, treasury={:?}, base_reward={})",
            config.admin, treasury, config.reward.base_reward
        );

        Ok(DataSourceRegistry {
            state: RwLock::new(RegistryState::default()),
            ledger,
            gate: AdminGate::new(config.admin),
            treasury,
            policy: RewardPolicy::from_config(&config.reward),
            reputation_increment: config.reward.reputation_increment,
            slow_threshold: Duration::from_millis(config.slow_operation_threshold_ms),
            events: EventLog::new(),
        })
    }

    /// Register a data source submitted by `owner`
    pub fn add(&self, name: &str, hash: &str, owner: Account, now: DateTime<Utc>) -> Result<()> {
        let _timer = self.timer("add");

        if hash.trim().is_empty() {
            warn!("Rejected data source with empty content hash");
            return Err(RegistryError::EmptyInput("content hash".to_string()));
        }
        if owner.is_zero() {
            warn!("Rejected data source {} with zero owner", hash);
            return Err(RegistryError::EmptyInput("owner account".to_string()));
        }

        let mut state = self.write_state()?;

        if state.sources.contains_key(hash) {
            warn!("Data source {} already exists", hash);
            return Err(RegistryError::AlreadyExists(hash.to_string()));
        }

        state
            .sources
            .insert(hash.to_string(), DataSourceRecord::new(hash, name, owner, now));
        state.hash_index.push(hash.to_string());

        info!("Data source {} ({}) added by {:?}", hash, name, owner);
        self.events.append(RegistryEvent::Added {
            hash: hash.to_string(),
            name: name.to_string(),
            owner,
            timestamp: now,
        })?;

        Ok(())
    }

    /// Verify a data source and pay its owner.
    ///
    /// The reward is computed from the verifier's reputation before this
    /// verification. If the ledger rejects the payment nothing is changed.
    pub fn verify(&self, hash: &str, verifier: Account, now: DateTime<Utc>) -> Result<Amount> {
        let _timer = self.timer("verify");

        let mut guard = self.write_state()?;
        let RegistryState { sources, verifiers, .. } = &mut *guard;

        let record = sources.get_mut(hash).ok_or_else(|| {
            warn!("Verification of unknown data source {}", hash);
            RegistryError::NotFound(format!("data source {}", hash))
        })?;

        if !verifiers.is_active(&verifier) {
            warn!("{:?} is not a verifier; cannot verify {}", verifier, hash);
            return Err(RegistryError::NotAuthorized(format!(
                "{:?} is not an active verifier",
                verifier
            )));
        }

        if record.verified {
            warn!("Data source {} already verified", hash);
            return Err(RegistryError::AlreadyVerified(hash.to_string()));
        }

        let reward = self.policy.compute(verifiers.reputation_of(&verifier));

        self.ledger
            .transfer(self.treasury, record.owner, reward)
            .map_err(|e| {
                warn!("Reward payment for {} failed: {}", hash, e);
                e
            })?;

        record.mark_verified(reward, verifier, now);
        let reputation = verifiers.bump_reputation(&verifier, self.reputation_increment)?;

        info!(
            "Data source {} verified by {:?}; paid {} to {:?}",
            hash, verifier, reward, record.owner
        );

        self.events.append(RegistryEvent::Verified {
            hash: hash.to_string(),
            verifier,
            reputation,
            timestamp: now,
        })?;
        self.events.append(RegistryEvent::Rewarded {
            hash: hash.to_string(),
            recipient: record.owner,
            amount: reward,
            timestamp: now,
        })?;

        Ok(reward)
    }

    /// Snapshot of a data source
    pub fn get(&self, hash: &str) -> Result<DataSourceRecord> {
        debug!("Reading data source {}", hash);
        self.read_state()?
            .sources
            .get(hash)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(format!("data source {}", hash)))
    }

    /// Content hashes in the order they were added
    pub fn list_all_hashes(&self) -> Result<Vec<String>> {
        Ok(self.read_state()?.hash_index.clone())
    }

    /// Log an access to a data source; no state changes
    pub fn record_access(&self, hash: &str, accessor: Account, now: DateTime<Utc>) -> Result<()> {
        let state = self.read_state()?;

        if !state.sources.contains_key(hash) {
            warn!("Access to unknown data source {}", hash);
            return Err(RegistryError::NotFound(format!("data source {}", hash)));
        }

        debug!("Data source {} accessed by {:?}", hash, accessor);
        self.events.append(RegistryEvent::Accessed {
            hash: hash.to_string(),
            accessor,
            timestamp: now,
        })?;

        Ok(())
    }

    /// Rate a data source, returning its updated rating statistics
    pub fn submit_feedback(
        &self,
        hash: &str,
        rating: u8,
        reviewer: Account,
        now: DateTime<Utc>,
    ) -> Result<RatingStats> {
        let _timer = self.timer("submit_feedback");

        let rating = Rating::new(rating).map_err(|e| {
            warn!("Rejected feedback for {}: {}", hash, e);
            e
        })?;

        let mut state = self.write_state()?;
        let record = state.sources.get_mut(hash).ok_or_else(|| {
            warn!("Feedback for unknown data source {}", hash);
            RegistryError::NotFound(format!("data source {}", hash))
        })?;

        let stats = record.rating.update(rating);
        record.rating = stats;

        info!(
            "Data source {} rated {} by {:?} (average {}, count {})",
            hash,
            rating.value(),
            reviewer,
            stats.average,
            stats.count
        );
        self.events.append(RegistryEvent::FeedbackProvided {
            hash: hash.to_string(),
            reviewer,
            rating: rating.value(),
            average: stats.average,
            count: stats.count,
            timestamp: now,
        })?;

        Ok(stats)
    }

    /// Register a verifier; `requester` must be the administrative principal
    pub fn add_verifier(&self, account: Account, requester: Account, now: DateTime<Utc>) -> Result<()> {
        let capability = self.gate.authorize(requester)?;

        let mut state = self.write_state()?;
        state.verifiers.register(account, &capability, now).map_err(|e| {
            warn!("Verifier registration of {:?} rejected: {}", account, e);
            e
        })?;

        info!("Verifier {:?} added", account);
        self.events.append(RegistryEvent::VerifierAdded {
            verifier: account,
            timestamp: now,
        })?;

        Ok(())
    }

    /// Whether `account` is an active verifier
    pub fn is_verifier(&self, account: Account) -> Result<bool> {
        Ok(self.read_state()?.verifiers.is_active(&account))
    }

    /// Reputation of `account`; 0 if never registered
    pub fn reputation_of(&self, account: Account) -> Result<u64> {
        Ok(self.read_state()?.verifiers.reputation_of(&account))
    }

    /// Snapshot of a verifier record
    pub fn get_verifier(&self, account: Account) -> Result<VerifierRecord> {
        self.read_state()?
            .verifiers
            .get(&account)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(format!("verifier {:?}", account)))
    }

    /// Verifier accounts in registration order
    pub fn list_verifiers(&self) -> Result<Vec<Account>> {
        Ok(self.read_state()?.verifiers.accounts().to_vec())
    }

    /// Mint `amount` into the treasury; `requester` must be the administrative principal
    pub fn fund_treasury(&self, requester: Account, amount: Amount) -> Result<()> {
        let _capability = self.gate.authorize(requester)?;

        // Serialized with verifications like any other mutation
        let _state = self.write_state()?;
        self.ledger.mint(self.treasury, amount)?;

        info!("Treasury {:?} funded with {}", self.treasury, amount);
        Ok(())
    }

    /// Ledger balance of `account`
    pub fn balance_of(&self, account: Account) -> Amount {
        self.ledger.balance_of(account)
    }

    /// Aggregate statistics from a single snapshot
    pub fn stats(&self) -> Result<RegistryStats> {
        let state = self.read_state()?;

        let mut stats = RegistryStats {
            total_sources: state.sources.len(),
            verifier_count: state.verifiers.len(),
            ..RegistryStats::default()
        };
        for record in state.sources.values() {
            if record.verified {
                stats.verified_sources += 1;
                stats.total_rewards_paid = stats.total_rewards_paid.saturating_add(record.reward);
            }
            stats.total_ratings += record.rating.count;
        }

        Ok(stats)
    }

    /// The administrative principal
    pub fn admin(&self) -> Account {
        self.gate.admin()
    }

    /// Account rewards are paid from
    pub fn treasury(&self) -> Account {
        self.treasury
    }

    /// Reward policy in force
    pub fn reward_policy(&self) -> &RewardPolicy {
        &self.policy
    }

    /// The access log
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The ledger rewards are paid through
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, RegistryState>> {
        self.state
            .read()
            .map_err(|e| to_state_error(format!("Failed to read registry state: {}", e)))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, RegistryState>> {
        self.state
            .write()
            .map_err(|e| to_state_error(format!("Failed to write registry state: {}", e)))
    }

    fn timer(&self, operation: &'static str) -> OperationTimer {
        OperationTimer::start(operation, self.slow_threshold)
    }
}
