//! Table catalog: the fixed set of document tables and their columns.
//!
//! The schema is static by design. Each table carries an autoincrement `id`,
//! a JSON-encoded `embedding` column, a unique `file_path` used as the
//! default upsert conflict target, and a store-defaulted `created_at`,
//! plus its own domain columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage class of a column, used to decode scanned rows without
/// reflecting column metadata at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
}

/// A column in the static schema.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn text(name: &'static str) -> Column {
    Column {
        name,
        kind: ColumnKind::Text,
    }
}

const fn integer(name: &'static str) -> Column {
    Column {
        name,
        kind: ColumnKind::Integer,
    }
}

/// The five document tables known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Sessions,
    CaseStudies,
    Protocols,
    Capabilities,
    SystemDocs,
}

/// Default conflict target for upserts. `file_path` is unique in every table.
pub const DEFAULT_CONFLICT_TARGET: &str = "file_path";

const SESSIONS_COLUMNS: &[Column] = &[
    integer("id"),
    text("date"),
    integer("session_number"),
    text("title"),
    text("content"),
    text("embedding"),
    text("file_path"),
    text("created_at"),
];

const CASE_STUDIES_COLUMNS: &[Column] = &[
    integer("id"),
    text("case_id"),
    text("title"),
    text("content"),
    text("embedding"),
    text("file_path"),
    text("created_at"),
    text("code"),
];

const PROTOCOLS_COLUMNS: &[Column] = &[
    integer("id"),
    text("protocol_id"),
    text("title"),
    text("content"),
    text("embedding"),
    text("file_path"),
    text("created_at"),
    text("code"),
];

const CAPABILITIES_COLUMNS: &[Column] = &[
    integer("id"),
    text("name"),
    text("content"),
    text("embedding"),
    text("file_path"),
    text("created_at"),
];

const SYSTEM_DOCS_COLUMNS: &[Column] = &[
    integer("id"),
    text("filename"),
    text("doc_type"),
    text("content"),
    text("embedding"),
    text("file_path"),
    text("created_at"),
];

impl Table {
    /// All tables, in bootstrap order.
    pub const ALL: [Table; 5] = [
        Table::Sessions,
        Table::CaseStudies,
        Table::Protocols,
        Table::Capabilities,
        Table::SystemDocs,
    ];

    /// SQL name of the table.
    pub fn name(&self) -> &'static str {
        match self {
            Table::Sessions => "sessions",
            Table::CaseStudies => "case_studies",
            Table::Protocols => "protocols",
            Table::Capabilities => "capabilities",
            Table::SystemDocs => "system_docs",
        }
    }

    /// Full column enumeration for the table.
    pub fn columns(&self) -> &'static [Column] {
        match self {
            Table::Sessions => SESSIONS_COLUMNS,
            Table::CaseStudies => CASE_STUDIES_COLUMNS,
            Table::Protocols => PROTOCOLS_COLUMNS,
            Table::Capabilities => CAPABILITIES_COLUMNS,
            Table::SystemDocs => SYSTEM_DOCS_COLUMNS,
        }
    }

    /// Whether `column` exists in this table.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns().iter().any(|c| c.name == column)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sessions" => Ok(Table::Sessions),
            "case_studies" => Ok(Table::CaseStudies),
            "protocols" => Ok(Table::Protocols),
            "capabilities" => Ok(Table::Capabilities),
            "system_docs" => Ok(Table::SystemDocs),
            other => Err(format!("unknown table: '{other}'")),
        }
    }
}

/// Resolve a search RPC name to its target table.
///
/// Returns `None` for names outside the static mapping; callers surface
/// that as a soft "Unknown RPC" result rather than raising.
pub fn rpc_target(func_name: &str) -> Option<Table> {
    match func_name {
        "search_sessions" => Some(Table::Sessions),
        "search_case_studies" => Some(Table::CaseStudies),
        "search_protocols" => Some(Table::Protocols),
        "search_capabilities" => Some(Table::Capabilities),
        "search_system_docs" => Some(Table::SystemDocs),
        _ => None,
    }
}
