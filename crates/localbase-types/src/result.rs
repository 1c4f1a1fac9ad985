//! The uniform success/error envelope returned by every store operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::QueryError;

/// Outcome of a table or RPC operation.
///
/// Exactly one of `data` / `error` is meaningful. Mirrors the remote
/// client's envelope so callers can read `.data` directly or chain
/// through [`QueryResult::execute`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub data: Option<Vec<Value>>,
    pub error: Option<String>,
}

impl QueryResult {
    /// A successful result carrying `data`.
    pub fn success(data: Vec<Value>) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// A failed result with no data.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
        }
    }

    /// A failed result that still carries an empty data set, matching the
    /// remote API's behavior for unknown RPC names.
    pub fn failure_with_empty_data(error: impl Into<String>) -> Self {
        Self {
            data: Some(Vec::new()),
            error: Some(error.into()),
        }
    }

    /// Re-raise a stored error, or pass the result through unchanged.
    pub fn execute(self) -> Result<Self, QueryError> {
        match self.error {
            Some(message) => Err(QueryError(message)),
            None => Ok(self),
        }
    }
}
