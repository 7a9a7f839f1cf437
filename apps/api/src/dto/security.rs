use serde::{Deserialize, Serialize};
use tenantdesk_application::{
    AuthorizationSummary, PermissionModuleGroup, PermissionProvenanceEntry, RoleAssignmentStatus,
};
use tenantdesk_domain::Permission;
use ts_rs::TS;

/// Query string of the authorization summary endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct AuthorizationSummaryQuery {
    #[serde(default)]
    pub include_denied: bool,
}

/// Permission catalog entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub key: String,
    pub name: String,
}

impl From<Permission> for PermissionResponse {
    fn from(permission: Permission) -> Self {
        Self {
            id: permission.id().as_i64(),
            key: permission.key().as_str().to_owned(),
            name: permission.name().to_owned(),
        }
    }
}

/// Active permissions of one module.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-module-response.ts"
)]
pub struct PermissionModuleResponse {
    pub module: String,
    pub permissions: Vec<PermissionResponse>,
}

impl From<PermissionModuleGroup> for PermissionModuleResponse {
    fn from(group: PermissionModuleGroup) -> Self {
        Self {
            module: group.module,
            permissions: group
                .permissions
                .into_iter()
                .map(PermissionResponse::from)
                .collect(),
        }
    }
}

/// Active role and whether the summarized user holds it.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-assignment-status-response.ts"
)]
pub struct RoleAssignmentStatusResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub name: String,
    pub assigned: bool,
}

impl From<RoleAssignmentStatus> for RoleAssignmentStatusResponse {
    fn from(status: RoleAssignmentStatus) -> Self {
        Self {
            id: status.role_id.as_i64(),
            name: status.name,
            assigned: status.assigned,
        }
    }
}

/// Permission with the source that decided it.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-provenance-response.ts"
)]
pub struct PermissionProvenanceResponse {
    pub key: String,
    pub name: String,
    pub module: String,
    /// One of `Role`, `DirectGrant`, `DirectDeny`.
    pub provenance: String,
    pub allowed: bool,
}

impl From<PermissionProvenanceEntry> for PermissionProvenanceResponse {
    fn from(entry: PermissionProvenanceEntry) -> Self {
        Self {
            key: entry.key,
            name: entry.name,
            module: entry.module,
            provenance: entry.provenance.as_str().to_owned(),
            allowed: entry.allowed,
        }
    }
}

/// Role and permission report for one user in one company.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/authorization-summary-response.ts"
)]
pub struct AuthorizationSummaryResponse {
    #[ts(type = "number")]
    pub user_id: i64,
    #[ts(type = "number")]
    pub company_id: i64,
    pub roles: Vec<RoleAssignmentStatusResponse>,
    pub permissions: Vec<PermissionProvenanceResponse>,
    pub denied: Vec<PermissionProvenanceResponse>,
}

impl From<AuthorizationSummary> for AuthorizationSummaryResponse {
    fn from(summary: AuthorizationSummary) -> Self {
        Self {
            user_id: summary.user_id.as_i64(),
            company_id: summary.company_id.as_i64(),
            roles: summary
                .roles
                .into_iter()
                .map(RoleAssignmentStatusResponse::from)
                .collect(),
            permissions: summary
                .permissions
                .into_iter()
                .map(PermissionProvenanceResponse::from)
                .collect(),
            denied: summary
                .denied
                .into_iter()
                .map(PermissionProvenanceResponse::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tenantdesk_application::{PermissionProvenanceEntry, RoleAssignmentStatus};
    use tenantdesk_domain::{Provenance, RoleId};

    use super::{PermissionProvenanceResponse, RoleAssignmentStatusResponse};

    #[test]
    fn provenance_is_serialized_with_transport_name() {
        let response = PermissionProvenanceResponse::from(PermissionProvenanceEntry {
            key: "inventory.delete".to_owned(),
            name: "Delete inventory".to_owned(),
            module: "inventory".to_owned(),
            provenance: Provenance::DirectDeny,
            allowed: false,
        });

        let value = serde_json::to_value(&response);
        assert!(value.is_ok());
        let value = value.unwrap_or_default();
        assert_eq!(value["provenance"], "DirectDeny");
        assert_eq!(value["allowed"], false);
    }

    #[test]
    fn role_status_is_serialized_with_id_field() {
        let response = RoleAssignmentStatusResponse::from(RoleAssignmentStatus {
            role_id: RoleId::new(3),
            name: "Manager".to_owned(),
            assigned: true,
        });

        let value = serde_json::to_value(&response);
        assert!(value.is_ok());
        let value = value.unwrap_or_default();
        assert_eq!(value["id"], 3);
        assert!(value.get("role_id").is_none());
        assert_eq!(value["assigned"], true);
    }
}
