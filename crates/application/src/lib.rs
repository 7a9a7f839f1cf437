//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod authorization_service;
mod menu_service;

pub use access_ports::{AccessRepository, CompanyRepository, MenuRepository};
pub use authorization_service::{
    AccessSnapshot, AuthorizationService, AuthorizationSummary, PermissionModuleGroup,
    PermissionProvenanceEntry, PermissionSources, RoleAssignmentStatus, SummaryOptions,
    merge_effective_permissions,
};
pub use menu_service::{
    MenuService, MenuServiceConfig, MenuVisibility, build_menu_tree, filter_menu,
};
