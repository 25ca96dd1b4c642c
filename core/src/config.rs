//! Configuration for the core crate
//!
//! This module provides configuration for the registry: the administrative
//! principal, the treasury that pays rewards, the reward policy, and logging.

use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::error::{to_config_error, RegistryError, Result};
use crate::models::{Account, Amount};
use crate::reward::{DEFAULT_BASE_REWARD, DEFAULT_TIER_BONUS, DEFAULT_TIER_SIZE};
use crate::utils;

/// Reputation gained per successful verification
pub const DEFAULT_REPUTATION_INCREMENT: u64 = 10;

/// Reward configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Reward paid regardless of reputation
    pub base_reward: Amount,

    /// Bonus per completed reputation tier
    pub tier_bonus: Amount,

    /// Reputation points per tier
    pub tier_size: u64,

    /// Reputation gained by a verifier per successful verification
    pub reputation_increment: u64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        RewardConfig {
            base_reward: DEFAULT_BASE_REWARD,
            tier_bonus: DEFAULT_TIER_BONUS,
            tier_size: DEFAULT_TIER_SIZE,
            reputation_increment: DEFAULT_REPUTATION_INCREMENT,
        }
    }
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// The single administrative principal
    pub admin: Account,

    /// Account rewards are paid from; the admin when unset
    #[serde(default)]
    pub treasury: Option<Account>,

    /// Reward policy
    #[serde(default)]
    pub reward: RewardConfig,

    /// Operations slower than this are logged at warn level
    #[serde(default = "default_slow_operation_threshold_ms")]
    pub slow_operation_threshold_ms: u64,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_slow_operation_threshold_ms() -> u64 {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

impl RegistryConfig {
    /// Create a configuration with default values for the given admin
    pub fn new(admin: Account) -> Self {
        RegistryConfig {
            admin,
            treasury: None,
            reward: RewardConfig::default(),
            slow_operation_threshold_ms: default_slow_operation_threshold_ms(),
            log_level: default_log_level(),
        }
    }

    /// Use a dedicated treasury account
    pub fn with_treasury(mut self, treasury: Account) -> Self {
        self.treasury = Some(treasury);
        self
    }

    /// Account rewards are paid from
    pub fn treasury_account(&self) -> Account {
        self.treasury.unwrap_or(self.admin)
    }

    /// Check the configuration for values the registry cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.admin.is_zero() {
            return Err(RegistryError::ConfigError(
                "admin account must not be the zero address".to_string(),
            ));
        }

        if self.treasury.map_or(false, |t| t.is_zero()) {
            return Err(RegistryError::ConfigError(
                "treasury account must not be the zero address".to_string(),
            ));
        }

        if self.reward.tier_size == 0 {
            return Err(RegistryError::ConfigError(
                "reward tier size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Initialise logging with `log_level` as the default filter.
    ///
    /// `RUST_LOG` still takes precedence when set.
    pub fn init_logging(&self) {
        utils::init_logging(&self.log_level);
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: RegistryConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self).map_err(to_config_error)?;
        Ok(())
    }

    /// Create a development configuration
    pub fn development(admin: Account) -> Self {
        let mut config = Self::new(admin);
        config.log_level = "debug".to_string();
        config
    }

    /// Create a testing configuration
    pub fn testing(admin: Account) -> Self {
        let mut config = Self::new(admin);
        config.log_level = "debug".to_string();
        config.slow_operation_threshold_ms = 5;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn admin() -> Account {
        Account::from_low_u64_be(1)
    }

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::new(admin());

        assert_eq!(config.reward.base_reward, 100);
        assert_eq!(config.reward.tier_bonus, 10);
        assert_eq!(config.reward.tier_size, 10);
        assert_eq!(config.reward.reputation_increment, 10);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.treasury_account(), admin());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dedicated_treasury() {
        let treasury = Account::from_low_u64_be(2);
        let config = RegistryConfig::new(admin()).with_treasury(treasury);

        assert_eq!(config.treasury_account(), treasury);
    }

    #[test]
    fn test_presets() {
        assert_eq!(RegistryConfig::development(admin()).log_level, "debug");

        let config = RegistryConfig::testing(admin());
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.slow_operation_threshold_ms, 5);
    }

    #[test]
    fn test_log_level_drives_logger_filter() {
        let filter_for = |config: &RegistryConfig| {
            let env = env_logger::Env::new().filter("DATA_REGISTRY_UNSET_FILTER");
            utils::logger_builder(env, &config.log_level).build().filter()
        };

        assert_eq!(filter_for(&RegistryConfig::new(admin())), log::LevelFilter::Info);
        assert_eq!(filter_for(&RegistryConfig::development(admin())), log::LevelFilter::Debug);

        RegistryConfig::testing(admin()).init_logging();
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            RegistryConfig::new(Account::zero()).validate(),
            Err(RegistryError::ConfigError(_))
        ));

        assert!(matches!(
            RegistryConfig::new(admin()).with_treasury(Account::zero()).validate(),
            Err(RegistryError::ConfigError(_))
        ));

        let mut config = RegistryConfig::new(admin());
        config.reward.tier_size = 0;
        assert!(matches!(config.validate(), Err(RegistryError::ConfigError(_))));
    }

    #[test]
    fn test_config_file_io() {
        let config = RegistryConfig::new(admin()).with_treasury(Account::from_low_u64_be(2));

        let temp_file = NamedTempFile::new().unwrap();
        config.to_file(temp_file.path()).unwrap();

        let loaded = RegistryConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_sparse_config_uses_defaults() {
        let json = r#"{ "admin": "0x0000000000000000000000000000000000000001" }"#;
        let config: RegistryConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.admin, admin());
        assert_eq!(config.reward, RewardConfig::default());
        assert_eq!(config.log_level, "info");
        assert!(config.treasury.is_none());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(
            temp_file.path(),
            r#"{ "admin": "0x0000000000000000000000000000000000000000" }"#,
        )
        .unwrap();

        assert!(matches!(
            RegistryConfig::from_file(temp_file.path()),
            Err(RegistryError::ConfigError(_))
        ));
    }
}
