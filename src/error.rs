use thiserror::Error;

/// Errors raised by a backing store client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store connection closed")]
    Closed,
}

/// Errors surfaced to callers of the search pipeline
///
/// Only index failures and aborted requests are fatal. Partial or malformed
/// attribute records are recovered inside the pipeline and never show up here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("geo index unavailable: {0}")]
    IndexUnavailable(#[source] StoreError),

    #[error("search timed out after {0} ms")]
    Timeout(u64),

    #[error("search cancelled")]
    Cancelled,

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// A stored attribute that could not be coerced into its typed form
#[derive(Error, Debug, Clone, PartialEq)]
#[error("malformed attribute `{field}` = {value:?}: {reason}")]
pub struct MalformedAttribute {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

impl MalformedAttribute {
    pub fn new(field: &'static str, value: &str, reason: impl ToString) -> Self {
        Self {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
