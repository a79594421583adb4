use std::time::Duration;

use thiserror::Error;

/// The only failure the booking store reports: the backing file could not
/// complete a create, read or write within the configured bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl StoreError {
    pub(crate) fn timed_out(operation: &str, after: Duration) -> Self {
        Self::StorageUnavailable(format!("{operation} timed out after {after:?}"))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}
