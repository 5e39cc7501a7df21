//! User data model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of roles a user account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Citizen,
    Admin,
    Employee,
}

impl UserRole {
    /// Wire representation stored in the database and returned in responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Citizen => "citizen",
            Self::Admin => "admin",
            Self::Employee => "employee",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string is not part of the closed enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown role '{}'; allowed values: citizen, admin, employee",
            self.0
        )
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "citizen" => Ok(Self::Citizen),
            "admin" => Ok(Self::Admin),
            "employee" => Ok(Self::Employee),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// A registered user account.
///
/// The password credential is deliberately absent: it is write-only and never
/// leaves the persistence layer once stored.
///
/// ## Invariants
/// - `username` and `email` are each globally unique and non-empty.
/// - `created_at` is server-assigned and immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Merge-patch input for updating a user. `None` leaves the stored value
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
}

impl UserPatch {
    /// Whether the patch carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for role parsing and patch emptiness.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("citizen", UserRole::Citizen)]
    #[case("admin", UserRole::Admin)]
    #[case("employee", UserRole::Employee)]
    fn roles_parse_from_wire_strings(#[case] input: &str, #[case] expected: UserRole) {
        assert_eq!(input.parse::<UserRole>(), Ok(expected));
        assert_eq!(expected.as_str(), input);
    }

    #[test]
    fn unknown_role_lists_allowed_values() {
        let err = "mayor".parse::<UserRole>().expect_err("must reject");
        let message = err.to_string();
        assert!(message.contains("mayor"));
        assert!(message.contains("citizen, admin, employee"));
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(UserPatch::default().is_empty());
        let patch = UserPatch {
            email: Some("new@example.com".to_owned()),
            ..UserPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
