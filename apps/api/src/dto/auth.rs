use serde::Deserialize;
use ts_rs::TS;

/// Incoming payload for token-based bootstrap sign-in.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/bootstrap-request.ts"
)]
pub struct BootstrapRequest {
    pub token: String,
    #[ts(type = "number")]
    pub user_id: i64,
    /// Company to start in; defaults to the first company the user belongs to.
    #[ts(type = "number | null")]
    pub company_id: Option<i64>,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Incoming payload for switching the current company.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/switch-company-request.ts"
)]
pub struct SwitchCompanyRequest {
    #[ts(type = "number")]
    pub company_id: i64,
}
