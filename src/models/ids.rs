//! Strongly-typed ID wrappers for ledger entities
//!
//! Using newtype wrappers keeps movement IDs from being confused with any other
//! UUID flowing through the program (audit entry IDs, for instance).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Short prefixed form used in listings (e.g. `mov-1a2b3c4d`)
            pub fn short(&self) -> String {
                format!("{}{}", $display_prefix, &self.0.simple().to_string()[..8])
            }

            /// Check whether a user-typed identifier refers to this ID
            ///
            /// Accepts the full UUID, the short prefixed form, or a bare
            /// hex prefix of at least four characters.
            pub fn matches(&self, identifier: &str) -> bool {
                let identifier = identifier.trim();
                if let Ok(uuid) = Uuid::parse_str(identifier) {
                    return uuid == self.0;
                }
                let hex = identifier
                    .strip_prefix($display_prefix)
                    .unwrap_or(identifier)
                    .to_ascii_lowercase();
                hex.len() >= 4 && self.0.simple().to_string().starts_with(&hex)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.short())
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(MovementId, "mov-");
