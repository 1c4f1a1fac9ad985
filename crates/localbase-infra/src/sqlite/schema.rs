//! Idempotent schema bootstrap for the five document tables.
//!
//! Every table carries an autoincrement `id`, a JSON-encoded `embedding`
//! TEXT column, a unique `file_path` (the default upsert conflict target),
//! and a `created_at` defaulted by the store. `case_studies` and
//! `protocols` additionally keep their own unique external identifiers.

use sqlx::sqlite::SqlitePool;
use tracing::debug;

const CREATE_SESSIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT,
        session_number INTEGER,
        title TEXT,
        content TEXT,
        embedding TEXT,
        file_path TEXT UNIQUE,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    )
"#;

const CREATE_CASE_STUDIES: &str = r#"
    CREATE TABLE IF NOT EXISTS case_studies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        case_id TEXT UNIQUE,
        title TEXT,
        content TEXT,
        embedding TEXT,
        file_path TEXT UNIQUE,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        code TEXT
    )
"#;

const CREATE_PROTOCOLS: &str = r#"
    CREATE TABLE IF NOT EXISTS protocols (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        protocol_id TEXT UNIQUE,
        title TEXT,
        content TEXT,
        embedding TEXT,
        file_path TEXT UNIQUE,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        code TEXT
    )
"#;

const CREATE_CAPABILITIES: &str = r#"
    CREATE TABLE IF NOT EXISTS capabilities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        content TEXT,
        embedding TEXT,
        file_path TEXT UNIQUE,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    )
"#;

const CREATE_SYSTEM_DOCS: &str = r#"
    CREATE TABLE IF NOT EXISTS system_docs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        filename TEXT,
        doc_type TEXT,
        content TEXT,
        embedding TEXT,
        file_path TEXT UNIQUE,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Create any missing document tables. Safe to run on every open.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for ddl in [
        CREATE_SESSIONS,
        CREATE_CASE_STUDIES,
        CREATE_PROTOCOLS,
        CREATE_CAPABILITIES,
        CREATE_SYSTEM_DOCS,
    ] {
        sqlx::query(ddl).execute(pool).await?;
    }
    debug!("document schema ready");
    Ok(())
}
