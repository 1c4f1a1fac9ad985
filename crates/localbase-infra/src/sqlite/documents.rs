//! SQLite implementation of the `DocumentStore` trait.
//!
//! Upserts are single `INSERT ... ON CONFLICT(target) DO UPDATE` statements,
//! deletes are conjunctive equality filters, and scans decode rows into JSON
//! objects using each table's static column enumeration. Table and column
//! names interpolated into statements come from the static catalog or are
//! validated against it; all values are bound.

use serde_json::Value;
use sqlx::Row;

use localbase_core::store::DocumentStore;
use localbase_types::error::StoreError;
use localbase_types::record::{DocumentRecord, FieldValue};
use localbase_types::table::{ColumnKind, DEFAULT_CONFLICT_TARGET, Table};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `DocumentStore`.
pub struct SqliteDocumentStore {
    pool: DatabasePool,
}

type SqliteQuery<'q> = sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>;

fn bind_field<'q>(query: SqliteQuery<'q>, value: &FieldValue) -> SqliteQuery<'q> {
    match value {
        FieldValue::Text(s) => query.bind(s.clone()),
        FieldValue::Integer(i) => query.bind(*i),
        FieldValue::Real(f) => query.bind(*f),
        FieldValue::Null => query.bind(None::<String>),
    }
}

impl SqliteDocumentStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Open (and bootstrap) the database at `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = DatabasePool::new(database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

impl DocumentStore for SqliteDocumentStore {
    async fn upsert(
        &self,
        record: &DocumentRecord,
        on_conflict: Option<&str>,
    ) -> Result<(), StoreError> {
        let table = record.table();
        let target = on_conflict.unwrap_or(DEFAULT_CONFLICT_TARGET);
        if !table.has_column(target) {
            return Err(StoreError::UnknownColumn {
                table: table.name().to_string(),
                column: target.to_string(),
            });
        }

        let fields = record.fields();
        let columns: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let assignments: Vec<String> = columns
            .iter()
            .filter(|name| **name != "id")
            .map(|name| format!("{name}=excluded.{name}"))
            .collect();

        let sql = format!(
            "INSERT INTO {table} ({columns}) VALUES ({placeholders}) \
             ON CONFLICT({target}) DO UPDATE SET {assignments}",
            columns = columns.join(", "),
            assignments = assignments.join(", "),
        );

        let mut query = sqlx::query(&sql);
        for (_, value) in &fields {
            query = bind_field(query, value);
        }
        query
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete(
        &self,
        table: Table,
        filters: &[(String, FieldValue)],
    ) -> Result<u64, StoreError> {
        // The builder enforces this too; kept here so the trait contract
        // holds for any caller.
        if filters.is_empty() {
            return Err(StoreError::UnfilteredDelete);
        }
        for (column, _) in filters {
            if !table.has_column(column) {
                return Err(StoreError::UnknownColumn {
                    table: table.name().to_string(),
                    column: column.clone(),
                });
            }
        }

        let conditions: Vec<String> = filters
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect();
        let sql = format!("DELETE FROM {table} WHERE {}", conditions.join(" AND "));

        let mut query = sqlx::query(&sql);
        for (_, value) in filters {
            query = bind_field(query, value);
        }
        let result = query
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn fetch_all(&self, table: Table) -> Result<Vec<Value>, StoreError> {
        let sql = format!("SELECT * FROM {table}");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut object = serde_json::Map::new();
            for column in table.columns() {
                let value = match column.kind {
                    ColumnKind::Integer => row
                        .try_get::<Option<i64>, _>(column.name)
                        .map(|v| v.map_or(Value::Null, Value::from)),
                    ColumnKind::Text => row
                        .try_get::<Option<String>, _>(column.name)
                        .map(|v| v.map_or(Value::Null, Value::from)),
                }
                .map_err(|e| StoreError::Query(e.to_string()))?;
                object.insert(column.name.to_string(), value);
            }
            out.push(Value::Object(object));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use localbase_core::client::LocalClient;
    use localbase_core::search::SearchParams;
    use localbase_types::record::{
        CaseStudyRecord, SessionRecord, SystemDocRecord, encode_embedding,
    };

    async fn test_store() -> SqliteDocumentStore {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        SqliteDocumentStore::connect(&url).await.unwrap()
    }

    fn session(path: &str, content: &str, embedding: Option<Vec<f64>>) -> DocumentRecord {
        DocumentRecord::Session(SessionRecord {
            date: Some("2025-06-01".to_string()),
            session_number: Some(1),
            title: Some("A session".to_string()),
            content: Some(content.to_string()),
            embedding,
            file_path: path.to_string(),
        })
    }

    /// Unit vector whose cosine similarity against `[1, 0]` is `s`.
    fn vector_with_similarity(s: f64) -> Vec<f64> {
        vec![s, (1.0 - s * s).sqrt()]
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates_on_file_path() {
        let store = test_store().await;

        store
            .upsert(&session("sessions/001.md", "first", None), None)
            .await
            .unwrap();
        store
            .upsert(&session("sessions/001.md", "second", None), None)
            .await
            .unwrap();

        let rows = store.fetch_all(Table::Sessions).await.unwrap();
        assert_eq!(rows.len(), 1, "conflicting file_path must not add a row");
        assert_eq!(rows[0]["content"], "second");
        assert_eq!(rows[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_upsert_honors_explicit_conflict_target() {
        let store = test_store().await;

        let first = DocumentRecord::CaseStudy(CaseStudyRecord {
            case_id: Some("CS-7".to_string()),
            content: Some("v1".to_string()),
            file_path: "cases/old.md".to_string(),
            ..Default::default()
        });
        let second = DocumentRecord::CaseStudy(CaseStudyRecord {
            case_id: Some("CS-7".to_string()),
            content: Some("v2".to_string()),
            file_path: "cases/new.md".to_string(),
            ..Default::default()
        });

        store.upsert(&first, Some("case_id")).await.unwrap();
        store.upsert(&second, Some("case_id")).await.unwrap();

        let rows = store.fetch_all(Table::CaseStudies).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["content"], "v2");
        assert_eq!(rows[0]["file_path"], "cases/new.md");
    }

    #[tokio::test]
    async fn test_upsert_rejects_unknown_conflict_target() {
        let store = test_store().await;

        let err = store
            .upsert(&session("x", "c", None), Some("no_such_column"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownColumn { .. }));
    }

    #[tokio::test]
    async fn test_fetch_all_decodes_columns() {
        let store = test_store().await;
        store
            .upsert(
                &session("sessions/002.md", "hello", Some(vec![0.5, 0.5])),
                None,
            )
            .await
            .unwrap();

        let rows = store.fetch_all(Table::Sessions).await.unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row["id"], 1);
        assert_eq!(row["session_number"], 1);
        assert_eq!(row["embedding"], encode_embedding(&[0.5, 0.5]));
        assert!(
            row["created_at"].is_string(),
            "created_at should be defaulted by the store"
        );
    }

    #[tokio::test]
    async fn test_absent_fields_stay_null_and_survive_update() {
        let store = test_store().await;

        store
            .upsert(&session("sessions/003.md", "body", None), None)
            .await
            .unwrap();
        // Second upsert provides only content and file_path; title from the
        // first write must survive because absent columns are omitted.
        store
            .upsert(
                &DocumentRecord::Session(SessionRecord {
                    content: Some("updated body".to_string()),
                    file_path: "sessions/003.md".to_string(),
                    ..Default::default()
                }),
                None,
            )
            .await
            .unwrap();

        let rows = store.fetch_all(Table::Sessions).await.unwrap();
        assert_eq!(rows[0]["content"], "updated body");
        assert_eq!(rows[0]["title"], "A session");
        assert_eq!(rows[0]["embedding"], Value::Null);
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_matching_rows() {
        let store = test_store().await;
        store
            .upsert(&session("keep.md", "keep", None), None)
            .await
            .unwrap();
        store
            .upsert(&session("drop.md", "drop", None), None)
            .await
            .unwrap();

        let deleted = store
            .delete(
                Table::Sessions,
                &[("file_path".to_string(), FieldValue::from("drop.md"))],
            )
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        let rows = store.fetch_all(Table::Sessions).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["file_path"], "keep.md");
    }

    #[tokio::test]
    async fn test_delete_conjunction_of_filters() {
        let store = test_store().await;
        store
            .upsert(&session("a.md", "x", None), None)
            .await
            .unwrap();

        // Matching file_path but mismatching content: conjunction fails.
        let deleted = store
            .delete(
                Table::Sessions,
                &[
                    ("file_path".to_string(), FieldValue::from("a.md")),
                    ("content".to_string(), FieldValue::from("other")),
                ],
            )
            .await
            .unwrap();
        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn test_delete_rejects_empty_and_unknown_filters() {
        let store = test_store().await;

        let err = store.delete(Table::Sessions, &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::UnfilteredDelete));

        let err = store
            .delete(
                Table::Sessions,
                &[("nope".to_string(), FieldValue::from("x"))],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownColumn { .. }));
    }

    #[tokio::test]
    async fn test_search_round_trip_finds_itself() {
        let client = LocalClient::new(test_store().await);
        let embedding = vec![0.1, 0.2, 0.3];

        client
            .table(Table::Sessions)
            .upsert(
                session("sessions/010.md", "round trip", Some(embedding.clone())),
                None,
            )
            .await
            .execute()
            .unwrap();

        let result = client
            .rpc(
                "search_sessions",
                SearchParams::new(embedding).with_threshold(0.0),
            )
            .execute()
            .await;

        let data = result.data.unwrap();
        assert_eq!(data.len(), 1);
        let similarity = data[0]["similarity"].as_f64().unwrap();
        assert!((similarity - 1.0).abs() < 1e-9, "expected ~1.0, got {similarity}");
        assert!(data[0].get("embedding").is_none());
        assert_eq!(data[0]["content"], "round trip");
    }

    #[tokio::test]
    async fn test_search_top_k_above_threshold() {
        let client = LocalClient::new(test_store().await);
        let sims = [0.9, 0.85, 0.5, 0.45, 0.35, 0.3, 0.25, 0.2, 0.1, 0.05];

        for (i, s) in sims.iter().enumerate() {
            client
                .table(Table::SystemDocs)
                .upsert(
                    DocumentRecord::SystemDoc(SystemDocRecord {
                        filename: Some(format!("doc{i}.md")),
                        doc_type: Some("reference".to_string()),
                        content: Some(format!("similarity {s}")),
                        embedding: Some(vector_with_similarity(*s)),
                        file_path: format!("docs/doc{i}.md"),
                    }),
                    None,
                )
                .await
                .execute()
                .unwrap();
        }

        let result = client
            .rpc(
                "search_system_docs",
                SearchParams::new(vec![1.0, 0.0])
                    .with_threshold(0.4)
                    .with_limit(2),
            )
            .execute()
            .await;

        let data = result.data.unwrap();
        assert_eq!(data.len(), 2);
        let s0 = data[0]["similarity"].as_f64().unwrap();
        let s1 = data[1]["similarity"].as_f64().unwrap();
        assert!((s0 - 0.9).abs() < 1e-9);
        assert!((s1 - 0.85).abs() < 1e-9);
        for hit in &data {
            assert!(hit.get("embedding").is_none());
            assert!(hit["similarity"].as_f64().unwrap() > 0.4);
        }
    }

    #[tokio::test]
    async fn test_search_skips_malformed_embedding_rows() {
        let store = test_store().await;

        // Bypass the typed records to plant a corrupt embedding.
        sqlx::query(
            "INSERT INTO sessions (content, embedding, file_path) VALUES ('bad', 'not json', 'bad.md')",
        )
        .execute(&store.pool().writer)
        .await
        .unwrap();

        let client = LocalClient::new(store);
        client
            .table(Table::Sessions)
            .upsert(session("good.md", "good", Some(vec![1.0, 0.0])), None)
            .await
            .execute()
            .unwrap();

        let result = client
            .rpc(
                "search_sessions",
                SearchParams::new(vec![1.0, 0.0]).with_threshold(0.5),
            )
            .execute()
            .await;

        assert!(result.error.is_none(), "one bad row must not abort the scan");
        let data = result.data.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["file_path"], "good.md");
    }

    #[tokio::test]
    async fn test_search_excludes_rows_without_embeddings() {
        let client = LocalClient::new(test_store().await);
        client
            .table(Table::Sessions)
            .upsert(session("no-embedding.md", "text only", None), None)
            .await
            .execute()
            .unwrap();

        let result = client
            .rpc(
                "search_sessions",
                SearchParams::new(vec![1.0, 0.0]).with_threshold(0.0),
            )
            .execute()
            .await;

        assert!(result.error.is_none());
        assert!(result.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_rpc_is_soft_error() {
        let client = LocalClient::new(test_store().await);

        let result = client
            .rpc("search_memories", SearchParams::new(vec![1.0]))
            .execute()
            .await;

        assert_eq!(result.data.as_deref(), Some(&[][..]));
        assert_eq!(result.error.as_deref(), Some("Unknown RPC search_memories"));
        assert!(result.execute().is_err());
    }

    #[tokio::test]
    async fn test_duplicate_key_surfaces_as_soft_error() {
        let client = LocalClient::new(test_store().await);

        client
            .table(Table::Sessions)
            .upsert(session("dup.md", "a", None), None)
            .await
            .execute()
            .unwrap();

        // Conflicting on a column that is not the conflict target raises a
        // constraint violation inside SQLite; the envelope must absorb it.
        let second = DocumentRecord::CaseStudy(CaseStudyRecord {
            case_id: Some("CS-1".to_string()),
            file_path: "cases/a.md".to_string(),
            ..Default::default()
        });
        let third = DocumentRecord::CaseStudy(CaseStudyRecord {
            case_id: Some("CS-1".to_string()),
            file_path: "cases/b.md".to_string(),
            ..Default::default()
        });
        client
            .table(Table::CaseStudies)
            .upsert(second, None)
            .await
            .execute()
            .unwrap();
        let result = client.table(Table::CaseStudies).upsert(third, None).await;

        assert!(result.data.is_none());
        assert!(result.error.unwrap().to_lowercase().contains("unique"));
    }
}
