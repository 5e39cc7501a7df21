//! Shared classification of Diesel errors for the repository adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Datastore failure categories the adapters translate into port errors.
#[derive(Debug)]
pub(crate) enum DbFailure {
    /// A unique constraint fired.
    Duplicate(String),
    /// A foreign key constraint fired.
    ForeignKey(String),
    /// The connection dropped mid-statement.
    Connection(String),
    /// Anything else, reported as a plain query failure.
    Other(String),
}

/// Classify a Diesel error by the constraint or condition that produced it.
///
/// Unique and foreign key violations are significant: they are the schema's
/// backstop for races between a validation read and the subsequent write.
pub(crate) fn classify(error: DieselError) -> DbFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            let message = info.message().to_owned();
            match kind {
                DatabaseErrorKind::UniqueViolation => DbFailure::Duplicate(message),
                DatabaseErrorKind::ForeignKeyViolation => DbFailure::ForeignKey(message),
                DatabaseErrorKind::ClosedConnection => DbFailure::Connection(message),
                _ => DbFailure::Other(message),
            }
        }
        DieselError::NotFound => DbFailure::Other("record not found".to_owned()),
        other => {
            debug!(error = %other, "diesel operation failed");
            DbFailure::Other(other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error classification.
    use super::*;

    #[test]
    fn not_found_is_a_plain_query_failure() {
        let failure = classify(DieselError::NotFound);
        assert!(matches!(failure, DbFailure::Other(message) if message == "record not found"));
    }

    #[test]
    fn rollback_errors_are_plain_query_failures() {
        let failure = classify(DieselError::RollbackTransaction);
        assert!(matches!(failure, DbFailure::Other(_)));
    }
}
