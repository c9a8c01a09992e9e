use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Store-assigned entity IDs
define_id!(ScenarioId);
define_id!(MissionId);
define_id!(BlockId);
define_id!(CommuneId);

// Account IDs
define_id!(UserId);

/// Stable key used for list addressing and UI identity.
///
/// Positive values mirror a store-assigned id (or the index-synthesized
/// fallback for records that arrive without one); strictly negative values
/// are allocated by the edit buffer for entities the store has never seen,
/// so the two ranges can never collide. A `LocalId` is never placed in a
/// request payload — only the typed remote ids above are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalId(i64);

impl LocalId {
    /// Mirror a store-assigned id.
    pub fn from_remote(raw: i64) -> Self {
        Self(raw)
    }

    /// Index fallback for records that arrive without any identifier.
    pub fn from_index(index: usize) -> Self {
        Self(index as i64 + 1)
    }

    /// Key for a locally-created entity; `n` comes from the buffer's
    /// allocator and starts at 1.
    pub fn temp(n: u32) -> Self {
        Self(-i64::from(n))
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// True for keys allocated locally, i.e. never seen by the store.
    pub fn is_temp(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_ids_roundtrip_through_i64() {
        let id = MissionId::new(7);
        assert_eq!(id.as_i64(), 7);
        assert_eq!(i64::from(id), 7);
        assert_eq!(MissionId::from(7), id);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn temp_local_ids_never_collide_with_remote_ones() {
        assert!(LocalId::temp(1).is_temp());
        assert!(!LocalId::from_remote(1).is_temp());
        assert!(!LocalId::from_index(0).is_temp());
        assert_ne!(LocalId::temp(1), LocalId::from_remote(1));
    }

    #[test]
    fn index_fallback_is_one_based() {
        assert_eq!(LocalId::from_index(0).as_i64(), 1);
        assert_eq!(LocalId::from_index(4).as_i64(), 5);
    }
}
