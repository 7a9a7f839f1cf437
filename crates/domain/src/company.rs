use serde::{Deserialize, Serialize};
use tenantdesk_core::{AppResult, CompanyId, NonEmptyString};

/// Tenant that isolates role and permission assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    id: CompanyId,
    name: NonEmptyString,
}

impl Company {
    /// Creates a validated company record.
    pub fn new(id: CompanyId, name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
        })
    }

    /// Returns the company identifier.
    #[must_use]
    pub fn id(&self) -> CompanyId {
        self.id
    }

    /// Returns the company display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}
