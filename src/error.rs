// src/error.rs
use thiserror::Error;

/// Everything that can go wrong between receiving a candidate payload and
/// returning the persisted record.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// A field rule failed; the message names the offending field category.
    #[error("{0}")]
    Validation(&'static str),

    /// An update referenced an id with no stored candidate.
    #[error("Candidate not found")]
    NotFound,

    /// The email unique constraint fired.
    #[error("The email already exists in the database")]
    DuplicateEmail,

    /// The database could not be reached.
    #[error("Unable to connect to the database. Please make sure the database server is running")]
    Connectivity,

    /// Any other storage failure, passed through unmodified.
    #[error(transparent)]
    Storage(sqlx::Error),
}

/// Single translation point from storage errors to the intake taxonomy.
/// Nothing else in the crate inspects vendor error codes.
pub fn classify_storage_error(err: sqlx::Error) -> IntakeError {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => IntakeError::DuplicateEmail,
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Configuration(_) => IntakeError::Connectivity,
        other => IntakeError::Storage(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_exhaustion_reads_as_connectivity() {
        let err = classify_storage_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, IntakeError::Connectivity));
        assert_eq!(
            err.to_string(),
            "Unable to connect to the database. Please make sure the database server is running"
        );
    }

    #[test]
    fn io_failure_reads_as_connectivity() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(matches!(
            classify_storage_error(sqlx::Error::Io(io)),
            IntakeError::Connectivity
        ));
    }

    #[test]
    fn other_storage_errors_pass_through() {
        let err = classify_storage_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, IntakeError::Storage(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn duplicate_email_message_is_fixed() {
        assert_eq!(
            IntakeError::DuplicateEmail.to_string(),
            "The email already exists in the database"
        );
    }

    #[test]
    fn not_found_message_is_fixed() {
        assert_eq!(IntakeError::NotFound.to_string(), "Candidate not found");
    }
}
