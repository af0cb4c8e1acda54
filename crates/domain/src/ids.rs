use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque string identifiers.
///
/// Cross-entity links are expressed purely through these ids and resolved by
/// the orchestrator, so records never hold references to one another.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an authored identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Fresh identifier for procedurally generated content.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Barriers
define_id!(LockId);
define_id!(TrapId);
define_id!(DoorId);

// Devices
define_id!(PlateId);
define_id!(MechanismId);

// Puzzles and challenges
define_id!(PuzzleId);
define_id!(ChallengeId);

// Inventory
define_id!(ItemId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(LockId::generate(), LockId::generate());
    }

    #[test]
    fn ids_serialize_as_bare_strings() {
        let id = TrapId::new("needle-trap");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"needle-trap\"");
        let back: TrapId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
