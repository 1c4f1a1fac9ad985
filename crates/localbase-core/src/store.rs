//! DocumentStore trait definition.
//!
//! The embedded relational backend behind the client facade. The only
//! implementation lives in `localbase-infra` (`SqliteDocumentStore`).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use serde_json::Value;

use localbase_types::error::StoreError;
use localbase_types::record::{DocumentRecord, FieldValue};
use localbase_types::table::Table;

/// Embedded store offering indexed key-value rows with per-call commit.
pub trait DocumentStore: Send + Sync {
    /// Insert the record, or update every provided non-identifier column
    /// when `on_conflict` (default `file_path`) collides with an existing
    /// row. Single atomic statement, committed immediately.
    fn upsert(
        &self,
        record: &DocumentRecord,
        on_conflict: Option<&str>,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Delete rows matching the conjunction of all equality filters.
    /// Returns the number of rows removed. Filters must be non-empty and
    /// name only columns of `table`.
    fn delete(
        &self,
        table: Table,
        filters: &[(String, FieldValue)],
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;

    /// Load every row of `table` as a JSON object. Brute-force by design;
    /// the corpora this store serves stay in the low thousands of rows.
    fn fetch_all(
        &self,
        table: Table,
    ) -> impl std::future::Future<Output = Result<Vec<Value>, StoreError>> + Send;
}
