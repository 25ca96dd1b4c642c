//! Error types for the core crate
//!
//! This module provides a consolidated error type for the registry,
//! wrapping errors from the ledger collaborator and the ambient I/O layers.

use thiserror::Error;
use std::io;

use crate::ledger::LedgerError;
use crate::models::Account;

/// Core error type
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A required identity or hash was blank
    #[error("Empty input: {0} must not be empty")]
    EmptyInput(String),

    /// A data source with the same content hash is already registered
    #[error("Data source already exists: {0}")]
    AlreadyExists(String),

    /// The requested data source or verifier does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The data source has already been verified
    #[error("Data source already verified: {0}")]
    AlreadyVerified(String),

    /// The principal is not allowed to perform the operation
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// The account is already an active verifier
    #[error("Account is already a verifier: {0:?}")]
    AlreadyVerifier(Account),

    /// Rating outside of the accepted range
    #[error("Invalid rating {rating}: must be between {min} and {max}")]
    InvalidRating {
        /// Submitted rating
        rating: u8,
        /// Lowest accepted rating
        min: u8,
        /// Highest accepted rating
        max: u8,
    },

    /// Ledger rejected the operation
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// State management error
    #[error("State management error: {0}")]
    StateError(String),
}

/// Result type for the core crate
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Convert a displayable error to a StateError
pub fn to_state_error<E: std::fmt::Display>(err: E) -> RegistryError {
    RegistryError::StateError(err.to_string())
}

/// Convert a displayable error to a ConfigError
pub fn to_config_error<E: std::fmt::Display>(err: E) -> RegistryError {
    RegistryError::ConfigError(err.to_string())
}

impl RegistryError {
    /// Whether the error is a rejected precondition the caller can correct.
    ///
    /// Every error of the registry itself is caller-correctable; only
    /// poisoned state and I/O failures are reported as not.
    pub fn is_caller_correctable(&self) -> bool {
        !matches!(
            self,
            RegistryError::StateError(_) | RegistryError::IoError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: RegistryError = io_err.into();
        assert!(matches!(err, RegistryError::IoError(_)));

        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: RegistryError = json_err.into();
        assert!(matches!(err, RegistryError::JsonError(_)));

        let ledger_err = LedgerError::InsufficientFunds {
            account: Account::zero(),
            balance: 5,
            required: 100,
        };
        let err: RegistryError = ledger_err.clone().into();
        match err {
            RegistryError::Ledger(inner) => assert_eq!(inner, ledger_err),
            other => panic!("Expected Ledger variant, got {:?}", other),
        }

        match to_state_error("poisoned") {
            RegistryError::StateError(msg) => assert_eq!(msg, "poisoned"),
            other => panic!("Expected StateError variant, got {:?}", other),
        }
    }

    #[test]
    fn test_error_display() {
        let err = RegistryError::EmptyInput("content hash".to_string());
        assert_eq!(err.to_string(), "Empty input: content hash must not be empty");

        let err = RegistryError::InvalidRating { rating: 7, min: 1, max: 5 };
        assert_eq!(err.to_string(), "Invalid rating 7: must be between 1 and 5");

        // Ledger errors pass through unchanged
        let inner = LedgerError::SupplyOverflow;
        let err = RegistryError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn test_caller_correctable() {
        assert!(RegistryError::AlreadyExists("h1".into()).is_caller_correctable());
        assert!(RegistryError::NotAuthorized("x".into()).is_caller_correctable());
        assert!(!RegistryError::StateError("poisoned".into()).is_caller_correctable());
    }
}
