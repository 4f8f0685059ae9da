use thiserror::Error;

/// Error taxonomy for the create-document path.
///
/// Only `AdmissionRejected` is recovered locally (by the coordinator's
/// bounded retry); everything else propagates to the HTTP layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Shape or constraint violation on the input DTO.
    #[error("validation: {0}")]
    Validation(String),

    /// No limiter token was available after the retry budget was spent.
    #[error("request rate limit exceeded after {attempts} attempts")]
    AdmissionRejected { attempts: u32 },

    /// A referenced description/product row does not exist.
    #[error("missing reference: {0}")]
    MissingReference(String),

    /// Retryable persistence failure (connection loss, deadlock,
    /// serialization conflict). The coordinator does not retry these;
    /// callers may retry the whole request.
    #[error("transient database error: {0}")]
    Transient(#[source] sqlx::Error),

    /// Non-retryable persistence failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl CoreError {
    /// Classify a raw sqlx error into the transient/permanent split.
    ///
    /// Deadlocks (`40P01`) and serialization conflicts (`40001`) roll back
    /// cleanly and are safe to retry end-to-end, as are pool/IO failures.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => CoreError::Transient(err),
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some("40001") | Some("40P01") => CoreError::Transient(err),
                _ => CoreError::Database(err),
            },
            _ => CoreError::Database(err),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::Transient(_))
    }
}
