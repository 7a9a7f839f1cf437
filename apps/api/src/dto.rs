mod auth;
mod common;
mod menu;
mod security;

pub use auth::{BootstrapRequest, SwitchCompanyRequest};
pub use common::{
    CompanyResponse, EffectivePermissionsResponse, HealthResponse, UserIdentityResponse,
};
pub use menu::{MenuNodeResponse, MenuTreeNodeResponse};
pub use security::{
    AuthorizationSummaryQuery, AuthorizationSummaryResponse, PermissionModuleResponse,
    PermissionProvenanceResponse, PermissionResponse, RoleAssignmentStatusResponse,
};
