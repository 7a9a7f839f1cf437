use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tenantdesk_core::{AppError, AppResult, CompanyId, NonEmptyString, UserId};

/// Module bucket for permission keys that carry no `module.` prefix.
pub const DEFAULT_PERMISSION_MODULE: &str = "general";

/// Stable identifier of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(i64);

impl RoleId {
    /// Creates a role identifier from a stored integer key.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer key.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Stable identifier of a permission catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(i64);

impl PermissionId {
    /// Creates a permission identifier from a stored integer key.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer key.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for PermissionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Unique dotted permission key such as `inventory.items.edit`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionKey(String);

impl PermissionKey {
    /// Creates a validated permission key.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "permission key must not be empty".to_owned(),
            ));
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(format!(
                "permission key '{trimmed}' must not contain whitespace"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the key as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the module prefix (text before the first `.`).
    ///
    /// Keys without a prefix fall into [`DEFAULT_PERMISSION_MODULE`].
    #[must_use]
    pub fn module(&self) -> &str {
        match self.0.split_once('.') {
            Some((module, _)) if !module.is_empty() => module,
            _ => DEFAULT_PERMISSION_MODULE,
        }
    }
}

impl Display for PermissionKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for PermissionKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionKey> for String {
    fn from(value: PermissionKey) -> Self {
        value.0
    }
}

/// Named bundle of permissions that can be held within a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    is_active: bool,
}

impl Role {
    /// Creates a validated role record.
    pub fn new(id: RoleId, name: impl Into<String>, is_active: bool) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            is_active,
        })
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the role display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns whether the role participates in resolution.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

/// Permission catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    key: PermissionKey,
    name: String,
    is_active: bool,
}

impl Permission {
    /// Creates a validated permission record.
    ///
    /// A blank display name falls back to the key.
    pub fn new(
        id: PermissionId,
        key: impl Into<String>,
        name: impl Into<String>,
        is_active: bool,
    ) -> AppResult<Self> {
        let key = PermissionKey::new(key)?;
        let name = name.into();
        let name = if name.trim().is_empty() {
            key.as_str().to_owned()
        } else {
            name.trim().to_owned()
        };

        Ok(Self {
            id,
            key,
            name,
            is_active,
        })
    }

    /// Returns the permission identifier.
    #[must_use]
    pub fn id(&self) -> PermissionId {
        self.id
    }

    /// Returns the unique permission key.
    #[must_use]
    pub fn key(&self) -> &PermissionKey {
        &self.key
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the module bucket derived from the key.
    #[must_use]
    pub fn module(&self) -> &str {
        self.key.module()
    }

    /// Returns whether the permission can be granted.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

/// Role to permission association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RolePermission {
    /// Owning role.
    pub role_id: RoleId,
    /// Target permission.
    pub permission_id: PermissionId,
    /// Whether the role grants the permission.
    pub is_allowed: bool,
}

/// Role held by a user within one company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserCompanyRole {
    /// Role holder.
    pub user_id: UserId,
    /// Company scope.
    pub company_id: CompanyId,
    /// Held role.
    pub role_id: RoleId,
    /// Inactive rows are ignored by resolution.
    pub is_active: bool,
}

/// Direct per-company grant or denial that bypasses roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserCompanyPermission {
    /// Subject user.
    pub user_id: UserId,
    /// Company scope.
    pub company_id: CompanyId,
    /// Target permission.
    pub permission_id: PermissionId,
    /// `true` grants, `false` denies.
    pub is_allowed: bool,
}

/// Why a permission appears in an authorization summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Reached through an assigned role with no direct override.
    Role,
    /// Granted directly to the user in the company.
    DirectGrant,
    /// Denied directly to the user in the company.
    DirectDeny,
}

impl Provenance {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Role => "Role",
            Self::DirectGrant => "DirectGrant",
            Self::DirectDeny => "DirectDeny",
        }
    }

    /// Returns whether this provenance allows the permission.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::DirectDeny)
    }
}

/// Permissions the API itself checks before serving administrative views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPermission {
    /// Allows reading another user's authorization summary.
    SecurityAuthorizationRead,
    /// Allows reading the permission catalog.
    SecurityPermissionRead,
}

impl SystemPermission {
    /// Returns the permission key stored in the catalog.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityAuthorizationRead => "security.authorization.read",
            Self::SecurityPermissionRead => "security.permission.read",
        }
    }

    /// Returns all system permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[SystemPermission] = &[
            SystemPermission::SecurityAuthorizationRead,
            SystemPermission::SecurityPermissionRead,
        ];

        ALL
    }
}

impl FromStr for SystemPermission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown system permission '{value}'")))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;

    use super::{
        DEFAULT_PERMISSION_MODULE, Permission, PermissionId, PermissionKey, Provenance,
        SystemPermission,
    };

    #[test]
    fn permission_key_module_is_prefix_before_first_dot() {
        let key = PermissionKey::new("inventory.items.edit");
        assert!(key.is_ok());
        assert_eq!(
            key.map(|key| key.module().to_owned()).unwrap_or_default(),
            "inventory"
        );
    }

    #[test]
    fn permission_key_without_prefix_uses_default_module() {
        for raw in ["dashboard", ".hidden"] {
            let key = PermissionKey::new(raw);
            assert!(key.is_ok());
            assert_eq!(
                key.map(|key| key.module().to_owned()).unwrap_or_default(),
                DEFAULT_PERMISSION_MODULE
            );
        }
    }

    #[test]
    fn permission_key_rejects_blank_and_inner_whitespace() {
        assert!(PermissionKey::new("   ").is_err());
        assert!(PermissionKey::new("inventory. view").is_err());
    }

    #[test]
    fn permission_name_falls_back_to_key() {
        let permission = Permission::new(PermissionId::new(1), "crm.read", "  ", true);
        assert!(permission.is_ok());
        assert_eq!(
            permission
                .map(|permission| permission.name().to_owned())
                .unwrap_or_default(),
            "crm.read"
        );
    }

    #[test]
    fn only_direct_deny_is_not_allowed() {
        assert!(Provenance::Role.is_allowed());
        assert!(Provenance::DirectGrant.is_allowed());
        assert!(!Provenance::DirectDeny.is_allowed());
    }

    #[test]
    fn system_permission_roundtrip_storage_value() {
        for permission in SystemPermission::all() {
            let restored = SystemPermission::from_str(permission.as_str());
            assert_eq!(restored.ok(), Some(*permission));
        }
        assert!(SystemPermission::from_str("security.unknown").is_err());
    }

    proptest! {
        #[test]
        fn module_never_contains_a_dot(prefix in "[a-z]{0,8}", rest in "[a-z.]{0,12}") {
            let raw = format!("{prefix}.{rest}");
            let key = PermissionKey::new(raw);
            prop_assert!(key.is_ok());
            if let Ok(key) = key {
                prop_assert!(!key.module().contains('.'));
                prop_assert!(!key.module().is_empty());
            }
        }
    }
}
