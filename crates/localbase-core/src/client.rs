//! Client facade mirroring the remote document database's ergonomics.
//!
//! `client.table(t).upsert(...)`, `client.table(t).delete().eq(...).execute()`,
//! and `client.rpc(name, params).execute()` all defer I/O to the terminal
//! call. Operational failures come back inside the `QueryResult` envelope;
//! caller contract violations (an unfiltered delete) are raised.

use tracing::{error, warn};

use localbase_types::error::StoreError;
use localbase_types::record::{DocumentRecord, FieldValue};
use localbase_types::result::QueryResult;
use localbase_types::table::{Table, rpc_target};

use crate::search::{SearchParams, rank_rows};
use crate::store::DocumentStore;

/// Facade over a [`DocumentStore`], owned once per process.
pub struct LocalClient<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> LocalClient<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Bind a table for upsert or delete.
    pub fn table(&self, table: Table) -> TableBuilder<'_, S> {
        TableBuilder {
            client: self,
            table,
        }
    }

    /// Bind a named search RPC. Execution is deferred until
    /// [`RpcBuilder::execute`].
    pub fn rpc(&self, func_name: impl Into<String>, params: SearchParams) -> RpcBuilder<'_, S> {
        RpcBuilder {
            client: self,
            func_name: func_name.into(),
            params,
        }
    }
}

/// Per-table entry point.
pub struct TableBuilder<'a, S: DocumentStore> {
    client: &'a LocalClient<S>,
    table: Table,
}

impl<'a, S: DocumentStore> TableBuilder<'a, S> {
    /// Insert-or-update the record, keyed on `on_conflict` (default
    /// `file_path`). Store failures are logged and converted into an
    /// error-carrying result; this never raises.
    pub async fn upsert(
        &self,
        record: impl Into<DocumentRecord>,
        on_conflict: Option<&str>,
    ) -> QueryResult {
        let record = record.into();
        if record.table() != self.table {
            return QueryResult::failure(format!(
                "record for table '{}' sent to table '{}'",
                record.table(),
                self.table
            ));
        }

        match self.client.store.upsert(&record, on_conflict).await {
            Ok(()) => QueryResult::success(vec![record.to_row()]),
            Err(e) => {
                error!(table = %self.table, error = %e, "upsert failed");
                QueryResult::failure(e.to_string())
            }
        }
    }

    /// Start a filtered delete.
    pub fn delete(self) -> DeleteBuilder<'a, S> {
        DeleteBuilder {
            client: self.client,
            table: self.table,
            filters: Vec::new(),
        }
    }
}

/// Accumulates equality filters for a delete. Equality-only by design.
pub struct DeleteBuilder<'a, S: DocumentStore> {
    client: &'a LocalClient<S>,
    table: Table,
    filters: Vec<(String, FieldValue)>,
}

impl<S: DocumentStore> DeleteBuilder<'_, S> {
    /// Require `column = value`.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    /// Run the delete. An empty filter set is a contract violation and
    /// raises; it is never softened into a result envelope.
    pub async fn execute(self) -> Result<QueryResult, StoreError> {
        if self.filters.is_empty() {
            return Err(StoreError::UnfilteredDelete);
        }

        self.client.store.delete(self.table, &self.filters).await?;
        Ok(QueryResult::success(Vec::new()))
    }
}

/// A named search RPC bound to its parameters, not yet executed.
pub struct RpcBuilder<'a, S: DocumentStore> {
    client: &'a LocalClient<S>,
    func_name: String,
    params: SearchParams,
}

impl<S: DocumentStore> RpcBuilder<'_, S> {
    /// Resolve the RPC name, scan the target table, and rank the rows.
    pub async fn execute(&self) -> QueryResult {
        let Some(table) = rpc_target(&self.func_name) else {
            return QueryResult::failure_with_empty_data(format!(
                "Unknown RPC {}",
                self.func_name
            ));
        };

        let rows = match self.client.store.fetch_all(table).await {
            Ok(rows) => rows,
            Err(e) => {
                error!(table = %table, error = %e, "table scan failed");
                return QueryResult::failure(e.to_string());
            }
        };

        let ranking = rank_rows(rows, &self.params);
        if ranking.skipped > 0 {
            warn!(
                table = %table,
                skipped = ranking.skipped,
                "excluded rows with undecodable embeddings from search"
            );
        }

        QueryResult::success(ranking.hits)
    }
}
