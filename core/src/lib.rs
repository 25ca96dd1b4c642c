//! # Verifiable Data Registry Core
//!
//! Core registry logic for peer-verified data sources.
//!
//! A submitter registers a data source under its content hash; an
//! authorized verifier verifies it exactly once, which pays the owner a
//! reputation-weighted reward through the [`Ledger`]; anyone may rate it or
//! report an access. Every committed change is appended to a hash-chained
//! [`EventLog`].
//!
//! ```text
//! add ──► verify ──► RewardPolicy::compute ──► Ledger::transfer ──► reputation += 10
//!              │
//!              └──► submit_feedback / record_access
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod events;
pub mod ledger;
pub mod models;
pub mod rating;
pub mod registry;
pub mod reward;
pub mod utils;
pub mod verifier;

/// Re-export common types for ease of use
pub use config::{RegistryConfig, RewardConfig};
pub use error::{RegistryError, Result};
pub use events::{EventLog, LoggedEvent, RegistryEvent};
pub use ledger::{InMemoryLedger, Ledger, LedgerError};
pub use models::{Account, Amount, DataSourceRecord, RegistryStats, VerifierRecord};
pub use rating::{Rating, RatingStats};
pub use registry::DataSourceRegistry;
pub use reward::RewardPolicy;

/// Version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
