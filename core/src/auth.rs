//! Administrative authorization
//!
//! The administrative principal is fixed at construction. Admin-only
//! operations do not compare principals themselves; they require an
//! [`AdminCapability`], which only [`AdminGate::authorize`] can mint.

use log::warn;

use crate::error::{RegistryError, Result};
use crate::models::Account;

/// Proof that the caller was authorized as the administrative principal
#[derive(Debug)]
pub struct AdminCapability {
    principal: Account,
}

impl AdminCapability {
    /// The principal this capability was issued to
    pub fn principal(&self) -> Account {
        self.principal
    }
}

/// Single-principal authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminGate {
    admin: Account,
}

impl AdminGate {
    /// Create a gate for the given administrative principal
    pub fn new(admin: Account) -> Self {
        AdminGate { admin }
    }

    /// The administrative principal
    pub fn admin(&self) -> Account {
        self.admin
    }

    /// Issue a capability if `principal` is the administrative principal
    pub fn authorize(&self, principal: Account) -> Result<AdminCapability> {
        if principal != self.admin || principal.is_zero() {
            warn!("Rejected admin operation requested by {:?}", principal);
            return Err(RegistryError::NotAuthorized(format!(
                "{:?} is not the administrative principal",
                principal
            )));
        }

        Ok(AdminCapability { principal })
    }
}
