use thiserror::Error;

/// Errors raised by the store adapter.
///
/// These indicate caller contract violations or engine-level failures.
/// Expected operational noise (duplicate keys, one malformed row) is
/// converted into a [`crate::result::QueryResult`] instead of raised.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    /// Unconditional deletes are forbidden at the API, not just by convention.
    #[error("delete requires at least one equality filter")]
    UnfilteredDelete,

    #[error("unknown column '{column}' for table '{table}'")]
    UnknownColumn { table: String, column: String },
}

/// Error surfaced when `QueryResult::execute` is called on a result that
/// already carries an error message.
#[derive(Debug, Error)]
#[error("query failed: {0}")]
pub struct QueryError(pub String);

/// Errors from the similarity function.
#[derive(Debug, Error, PartialEq)]
pub enum SimilarityError {
    #[error("embedding length mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
}
