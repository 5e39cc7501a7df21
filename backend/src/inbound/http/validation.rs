//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs model every body field as `Option` so that missing required
//! fields surface as a 400 naming the first absent field, and enum-valued
//! strings are parsed here before they reach the domain.

use serde_json::json;

use crate::domain::{DocumentStatus, Error, UserRole};

/// Reject a request whose body omits a required field.
pub(crate) fn missing_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("{field} is required")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

/// Parse a document status string, rejecting values outside the closed enum.
pub(crate) fn parse_status(value: &str) -> Result<DocumentStatus, Error> {
    value.parse().map_err(|_| {
        Error::invalid_request(
            "Invalid status. Must be one of: pending, approved, rejected, in_progress",
        )
        .with_details(json!({
            "field": "status",
            "value": value,
            "code": "invalid_status",
        }))
    })
}

/// Parse a user role string, rejecting values outside the closed enum.
pub(crate) fn parse_role(value: &str) -> Result<UserRole, Error> {
    value.parse().map_err(|_| {
        Error::invalid_request("Invalid role. Must be one of: citizen, admin, employee")
            .with_details(json!({
                "field": "role",
                "value": value,
                "code": "invalid_role",
            }))
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for request field parsing.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[test]
    fn missing_field_names_the_field() {
        let err = missing_field_error("user_id");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "user_id is required");
    }

    #[rstest]
    #[case("pending", DocumentStatus::Pending)]
    #[case("in_progress", DocumentStatus::InProgress)]
    fn known_statuses_parse(#[case] input: &str, #[case] expected: DocumentStatus) {
        assert_eq!(parse_status(input).expect("valid status"), expected);
    }

    #[test]
    fn unknown_status_is_rejected_with_the_allowed_list() {
        let err = parse_status("archived").expect_err("must reject");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(err.message().contains("pending, approved, rejected, in_progress"));
    }

    #[test]
    fn unknown_role_is_rejected_with_the_allowed_list() {
        let err = parse_role("mayor").expect_err("must reject");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(err.message().contains("citizen, admin, employee"));
    }
}
