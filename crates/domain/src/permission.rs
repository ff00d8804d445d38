use serde::{Deserialize, Serialize};
use warden_core::{AppResult, NonEmptyString};

use crate::{PermissionId, PermissionScope};

/// Atomic capability token granted to principals through roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    value: NonEmptyString,
    scope: PermissionScope,
    description: String,
}

impl Permission {
    /// Creates a validated permission.
    ///
    /// The value is trimmed and must not be empty. The description is free text.
    pub fn new(
        id: PermissionId,
        value: impl Into<String>,
        scope: PermissionScope,
        description: impl Into<String>,
    ) -> AppResult<Self> {
        let value = value.into();
        let value = NonEmptyString::for_field("permission value", value.trim())?;

        Ok(Self {
            id,
            value,
            scope,
            description: description.into(),
        })
    }

    /// Returns the permission identifier.
    #[must_use]
    pub fn id(&self) -> PermissionId {
        self.id
    }

    /// Returns the capability value checked by authorization.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Returns the permission scope.
    #[must_use]
    pub fn scope(&self) -> PermissionScope {
        self.scope
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}
