//! Opaque identifiers shared by the domain entities.

use std::collections::HashSet;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warden_core::AppError;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value.trim())
                    .map(Self)
                    .map_err(|error| {
                        AppError::Validation(format!("invalid {} '{value}': {error}", $label))
                    })
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for a user identity.
    UserId,
    "user id"
);

uuid_identifier!(
    /// Unique identifier for a permission catalog entry.
    PermissionId,
    "permission id"
);

uuid_identifier!(
    /// Unique identifier for a role.
    RoleId,
    "role id"
);

uuid_identifier!(
    /// Unique identifier for a password reset request.
    ResetRequestId,
    "reset request id"
);

uuid_identifier!(
    /// Unique identifier for a broker owned by the broker service.
    BrokerId,
    "broker id"
);

/// Removes duplicate ids while keeping the first occurrence of each.
#[must_use]
pub fn dedupe_preserving_order<T>(ids: &[T]) -> Vec<T>
where
    T: Copy + Eq + Hash,
{
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
