//! Pure field validators shared by the lifecycle services.
//!
//! Existence and uniqueness checks live in the services themselves because
//! they need a repository handle; everything here is side-effect free.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::Error;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only: one @ with non-empty local part and a dotted domain.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Reject empty or whitespace-only values for a required text field.
pub fn require_text(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::invalid_request(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Reject values that do not look like an email address.
pub fn require_email_shape(value: &str) -> Result<(), Error> {
    if !email_regex().is_match(value) {
        return Err(Error::invalid_request(format!(
            "'{value}' is not a valid email address"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the pure validators.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case("alice@example.com")]
    #[case("clerk+intake@city.gov.gr")]
    #[case("a@b.co")]
    fn plausible_emails_pass(#[case] value: &str) {
        assert!(require_email_shape(value).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("alice")]
    #[case("alice@example")]
    #[case("@example.com")]
    #[case("alice @example.com")]
    #[case("alice@exa mple.com")]
    fn malformed_emails_fail(#[case] value: &str) {
        let err = require_email_shape(value).expect_err("must reject");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_required_fields_fail(#[case] value: &str) {
        let err = require_text("username", value).expect_err("must reject");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(err.message().contains("username"));
    }

    #[test]
    fn populated_required_fields_pass() {
        assert!(require_text("username", "alice").is_ok());
    }
}
