//! Shared domain types for localbase.
//!
//! This crate contains the types used across the localbase workspace:
//! the table catalog, per-table document records, the `QueryResult`
//! envelope, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod error;
pub mod record;
pub mod result;
pub mod table;
