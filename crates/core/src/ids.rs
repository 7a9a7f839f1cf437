use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Stable identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a user identifier from a stored integer key.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Creates an identifier from a transport value, rejecting non-positive keys.
    pub fn from_transport(value: i64) -> Result<Self, AppError> {
        ensure_positive(value, "user id").map(Self)
    }

    /// Returns the underlying integer key.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_positive_id(value, "user id").map(Self)
    }
}

/// Company (tenant) identifier scoping every role and permission assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(i64);

impl CompanyId {
    /// Creates a company identifier from a stored integer key.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Creates an identifier from a transport value, rejecting non-positive keys.
    pub fn from_transport(value: i64) -> Result<Self, AppError> {
        ensure_positive(value, "company id").map(Self)
    }

    /// Returns the underlying integer key.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for CompanyId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for CompanyId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_positive_id(value, "company id").map(Self)
    }
}

fn parse_positive_id(value: &str, label: &str) -> Result<i64, AppError> {
    let parsed = value
        .trim()
        .parse::<i64>()
        .map_err(|error| AppError::Validation(format!("invalid {label} '{value}': {error}")))?;

    ensure_positive(parsed, label)
}

fn ensure_positive(value: i64, label: &str) -> Result<i64, AppError> {
    if value <= 0 {
        return Err(AppError::Validation(format!(
            "{label} must be a positive integer, got '{value}'"
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{CompanyId, UserId};

    #[test]
    fn ids_parse_from_transport_values() {
        assert_eq!(UserId::from_str(" 5 ").ok(), Some(UserId::new(5)));
        assert_eq!(CompanyId::from_str("2").ok(), Some(CompanyId::new(2)));
    }

    #[test]
    fn ids_reject_non_positive_values() {
        assert!(UserId::from_str("0").is_err());
        assert!(CompanyId::from_str("-3").is_err());
        assert!(CompanyId::from_str("acme").is_err());
        assert!(UserId::from_transport(0).is_err());
        assert_eq!(CompanyId::from_transport(7).ok(), Some(CompanyId::new(7)));
    }
}
