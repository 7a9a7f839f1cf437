use serde::Serialize;
use tenantdesk_core::{CompanyId, UserIdentity};
use tenantdesk_domain::Company;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    #[ts(type = "number")]
    pub user_id: i64,
    pub display_name: String,
    pub email: Option<String>,
    #[ts(type = "number")]
    pub company_id: i64,
}

impl From<UserIdentity> for UserIdentityResponse {
    fn from(identity: UserIdentity) -> Self {
        Self {
            user_id: identity.user_id().as_i64(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
            company_id: identity.company_id().as_i64(),
        }
    }
}

/// Company the user belongs to.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/company-response.ts"
)]
pub struct CompanyResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub name: String,
    pub is_current: bool,
}

impl CompanyResponse {
    #[must_use]
    pub fn from_company(company: &Company, current: CompanyId) -> Self {
        Self {
            id: company.id().as_i64(),
            name: company.name().to_owned(),
            is_current: company.id() == current,
        }
    }
}

/// Sorted effective permission keys for the current company.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/effective-permissions-response.ts"
)]
pub struct EffectivePermissionsResponse {
    #[ts(type = "number")]
    pub company_id: i64,
    pub permissions: Vec<String>,
}
