//! Error types surfaced by the client library.

/// Failure while retrieving data from the budget backend.
///
/// Any of these aborts the aggregation in progress; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request for {resource} failed: {source}")]
    Http {
        resource: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Backend answered {status} for {resource}")]
    Status { resource: String, status: u16 },
    #[error("Could not decode {resource} response: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Year fetch task failed: {0}")]
    Task(String),
}

/// Failure while building a monthly summary
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Preference storage failed: {0}")]
    Storage(#[from] anyhow::Error),
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
    #[error("Request {requested} was superseded by request {latest}")]
    Superseded { requested: u64, latest: u64 },
}
