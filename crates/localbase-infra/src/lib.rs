//! Infrastructure layer for localbase.
//!
//! Contains the SQLite implementation of the `DocumentStore` trait defined
//! in `localbase-core`: connection pooling, idempotent schema bootstrap,
//! and the upsert / delete / scan statements.

pub mod sqlite;
