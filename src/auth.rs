//! Single-admin authorization gate.
//!
//! Mutating commands call [`AdminGate::authorize`] before touching their
//! arguments; read-only commands never consult the gate.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identity of whoever issued a command (a Telegram user id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerId(pub i64);

impl std::fmt::Display for CallerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Holds the one configured admin identity. Immutable once built.
#[derive(Debug, Clone, Copy)]
pub struct AdminGate {
    admin: CallerId,
}

impl AdminGate {
    pub fn new(admin: CallerId) -> Self {
        Self { admin }
    }

    pub fn is_admin(&self, caller: CallerId) -> bool {
        caller == self.admin
    }

    /// Fail with [`Error::NotAuthorized`] unless `caller` is the admin.
    pub fn authorize(&self, caller: CallerId) -> Result<()> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(Error::NotAuthorized)
        }
    }
}
