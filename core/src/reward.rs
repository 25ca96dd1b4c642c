//! Reputation-weighted reward calculation
//!
//! `reward = base_reward + (reputation / tier_size) * tier_bonus`, with
//! truncating division. With the default policy a verifier at reputation 0
//! earns 100 and one at reputation 30 earns 130.

use serde::{Serialize, Deserialize};

use crate::config::RewardConfig;
use crate::models::Amount;

/// Reward paid regardless of reputation
pub const DEFAULT_BASE_REWARD: Amount = 100;

/// Bonus per completed reputation tier
pub const DEFAULT_TIER_BONUS: Amount = 10;

/// Reputation points per tier
pub const DEFAULT_TIER_SIZE: u64 = 10;

/// Pure reward function parameterised by the configured policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPolicy {
    base_reward: Amount,
    tier_bonus: Amount,
    tier_size: u64,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        RewardPolicy {
            base_reward: DEFAULT_BASE_REWARD,
            tier_bonus: DEFAULT_TIER_BONUS,
            tier_size: DEFAULT_TIER_SIZE,
        }
    }
}

impl RewardPolicy {
    /// Build a policy from configuration
    pub fn from_config(config: &RewardConfig) -> Self {
        RewardPolicy {
            base_reward: config.base_reward,
            tier_bonus: config.tier_bonus,
            tier_size: config.tier_size,
        }
    }

    /// Reputation tier; a zero tier size puts everyone in tier 0
    pub fn tier(&self, reputation: u64) -> u64 {
        reputation.checked_div(self.tier_size).unwrap_or(0)
    }

    /// Reward owed for a verification by a verifier with `reputation`
    pub fn compute(&self, reputation: u64) -> Amount {
        let bonus = Amount::from(self.tier(reputation)).saturating_mul(self.tier_bonus);
        self.base_reward.saturating_add(bonus)
    }
}
