use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open climate database '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("table '{table}' does not match the expected columns: {source}")]
    Schema {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("query did not finish within {0:?}")]
    Timeout(Duration),

    #[error("stored date '{0}' is not in YYYY-MM-DD form")]
    InvalidDate(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
