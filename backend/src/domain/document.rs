//! Document request model.
//!
//! A document is the aggregate linking a user to a document type. Its status
//! is a four-valued enum with no enforced transition graph: any value may
//! follow any other.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of states a document request can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
    InProgress,
}

impl DocumentStatus {
    /// Wire representation stored in the database and returned in responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::InProgress => "in_progress",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not part of the closed enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown status '{}'; allowed values: pending, approved, rejected, in_progress",
            self.0
        )
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for DocumentStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "in_progress" => Ok(Self::InProgress),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// A stored document request.
///
/// ## Invariants
/// - `user_id` and `doctype_id` always resolve to existing rows.
/// - `request_date` is server-assigned at creation and immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Document {
    pub id: i64,
    pub user_id: i64,
    pub doctype_id: i64,
    pub status: DocumentStatus,
    pub request_date: DateTime<Utc>,
    pub issue_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// A document enriched with display fields copied from its joined user and
/// document type rows, for read convenience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DocumentDetails {
    pub document: Document,
    pub user_name: String,
    pub user_email: String,
    pub doctype_name: String,
    pub doctype_description: Option<String>,
}

/// Validated input for creating a document request.
///
/// Status is not an input: every new document starts as
/// [`DocumentStatus::Pending`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocumentRequest {
    pub user_id: i64,
    pub doctype_id: i64,
    pub notes: Option<String>,
}

/// Merge-patch input for updating a document. `None` leaves the stored value
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    pub user_id: Option<i64>,
    pub doctype_id: Option<i64>,
    pub status: Option<DocumentStatus>,
    pub issue_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl DocumentPatch {
    /// Whether the patch carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.doctype_id.is_none()
            && self.status.is_none()
            && self.issue_date.is_none()
            && self.notes.is_none()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for status parsing and patch emptiness.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("pending", DocumentStatus::Pending)]
    #[case("approved", DocumentStatus::Approved)]
    #[case("rejected", DocumentStatus::Rejected)]
    #[case("in_progress", DocumentStatus::InProgress)]
    fn statuses_parse_from_wire_strings(#[case] input: &str, #[case] expected: DocumentStatus) {
        assert_eq!(input.parse::<DocumentStatus>(), Ok(expected));
        assert_eq!(expected.as_str(), input);
    }

    #[test]
    fn unknown_status_lists_allowed_values() {
        let err = "archived".parse::<DocumentStatus>().expect_err("must reject");
        let message = err.to_string();
        assert!(message.contains("archived"));
        assert!(message.contains("pending, approved, rejected, in_progress"));
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(DocumentPatch::default().is_empty());
        let patch = DocumentPatch {
            status: Some(DocumentStatus::Approved),
            ..DocumentPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let value = serde_json::to_value(DocumentStatus::InProgress).expect("serializable");
        assert_eq!(value, serde_json::json!("in_progress"));
    }
}
