use serde::{Deserialize, Serialize};

use crate::{CompanyId, UserId};

/// Authenticated user persisted in the session together with the company
/// the user is currently working in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: UserId,
    display_name: String,
    email: Option<String>,
    company_id: CompanyId,
}

impl UserIdentity {
    /// Creates a user identity from authentication and tenancy data.
    #[must_use]
    pub fn new(
        user_id: UserId,
        display_name: impl Into<String>,
        email: Option<String>,
        company_id: CompanyId,
    ) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            email,
            company_id,
        }
    }

    /// Returns the stable user identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the email, if the provider returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the company the identity is currently scoped to.
    #[must_use]
    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns a copy of this identity scoped to another company.
    #[must_use]
    pub fn with_company(&self, company_id: CompanyId) -> Self {
        Self {
            company_id,
            ..self.clone()
        }
    }
}
