//! Caller capabilities.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Capability resolved by the external identity provider.
///
/// Admin checks live in the ledger's admin operations, not in the transport
/// layer, so embedding callers get the same enforcement as HTTP callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    User,
    Admin,
}

impl Capability {
    pub fn is_admin(self) -> bool {
        matches!(self, Capability::Admin)
    }
}

impl FromStr for Capability {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Capability::User),
            "admin" => Ok(Capability::Admin),
            _ => Err(()),
        }
    }
}
