//! SQLite storage layer.
//!
//! WAL mode with split read/write connection pools, a fixed schema created
//! on open, and a `DocumentStore` implementation built on sqlx.

pub mod documents;
pub mod pool;
pub mod schema;

pub use documents::SqliteDocumentStore;
pub use pool::DatabasePool;
