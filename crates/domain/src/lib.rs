//! Domain records and invariants.

#![forbid(unsafe_code)]

mod company;
mod menu;
mod security;

pub use company::Company;
pub use menu::{MenuId, MenuNode, MenuTreeNode, OrphanPolicy};
pub use security::{
    DEFAULT_PERMISSION_MODULE, Permission, PermissionId, PermissionKey, Provenance, Role, RoleId,
    RolePermission, SystemPermission, UserCompanyPermission, UserCompanyRole,
};
