//! Verifiable Data Registry - peer-verified data sources with token rewards
//!
//! This is the root crate that provides workspace-level documentation.
//! Actual implementation is in the subcrates:
//! - `data-registry-core`: data-source registry, verifier registry, reward
//!   and rating logic, access log and the ledger abstraction

/// Returns the version of the package.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
