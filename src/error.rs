/// Error type shared across the discovery pipeline.
///
/// Adapter-level failures are caught at the orchestrator and logged; only
/// `Database` errors from opening the store are treated as fatal.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True when the underlying database error is a UNIQUE constraint hit.
    /// Duplicate URLs are expected during discovery and are not failures.
    pub fn is_unique_violation(&self) -> bool {
        if let AppError::Database(sqlx::Error::Database(db_err)) = self {
            return db_err.is_unique_violation();
        }
        false
    }
}
