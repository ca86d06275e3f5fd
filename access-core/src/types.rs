//! Identifier newtypes used across the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Textual principal of a user (or of any ledger account owner).
    Principal
);

string_id!(
    /// Identifier of a remote service: a ledger, governance canister or
    /// credential issuer.
    CanisterId
);

string_id!(
    /// Identifier of a governed entity (group, channel or community).
    EntityId
);

/// Ledger account: an owner plus an optional 32-byte subaccount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub owner: Principal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subaccount: Option<[u8; 32]>,
}

impl Account {
    /// Default account of `owner` (no subaccount).
    pub fn of(owner: Principal) -> Self {
        Self {
            owner,
            subaccount: None,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subaccount {
            Some(sub) => {
                write!(f, "{}.", self.owner)?;
                for byte in sub {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            None => write!(f, "{}", self.owner),
        }
    }
}
