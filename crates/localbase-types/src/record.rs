//! Typed document records, one per table.
//!
//! The remote client this store emulates accepts free-form maps and reflects
//! column names from keys at runtime. Here every table has an explicit record
//! type with `deny_unknown_fields`, so an unknown field is rejected at
//! deserialization instead of producing a broken statement.
//!
//! Absent optional fields are omitted from the generated statement: an insert
//! leaves them NULL, and a conflict-update leaves the stored value untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::table::Table;

/// A value bound into a SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Null,
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Real(v)
    }
}

impl From<&FieldValue> for Value {
    fn from(v: &FieldValue) -> Self {
        match v {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Real(f) => Value::from(*f),
            FieldValue::Null => Value::Null,
        }
    }
}

/// Serialize an embedding vector to its stored textual encoding.
pub fn encode_embedding(values: &[f64]) -> String {
    serde_json::to_string(values).expect("a float slice always serializes to JSON")
}

/// Decode a stored embedding back into a vector.
pub fn decode_embedding(encoded: &str) -> Result<Vec<f64>, serde_json::Error> {
    serde_json::from_str(encoded)
}

/// A row of the `sessions` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionRecord {
    pub date: Option<String>,
    pub session_number: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub embedding: Option<Vec<f64>>,
    pub file_path: String,
}

/// A row of the `case_studies` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseStudyRecord {
    pub case_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub code: Option<String>,
    pub embedding: Option<Vec<f64>>,
    pub file_path: String,
}

/// A row of the `protocols` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtocolRecord {
    pub protocol_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub code: Option<String>,
    pub embedding: Option<Vec<f64>>,
    pub file_path: String,
}

/// A row of the `capabilities` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapabilityRecord {
    pub name: Option<String>,
    pub content: Option<String>,
    pub embedding: Option<Vec<f64>>,
    pub file_path: String,
}

/// A row of the `system_docs` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemDocRecord {
    pub filename: Option<String>,
    pub doc_type: Option<String>,
    pub content: Option<String>,
    pub embedding: Option<Vec<f64>>,
    pub file_path: String,
}

/// A document destined for one of the five tables.
///
/// Knows its target table and enumerates the `(column, value)` pairs it
/// provides. The `id` column is never part of the enumeration; it is owned
/// by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRecord {
    Session(SessionRecord),
    CaseStudy(CaseStudyRecord),
    Protocol(ProtocolRecord),
    Capability(CapabilityRecord),
    SystemDoc(SystemDocRecord),
}

fn push_text(out: &mut Vec<(&'static str, FieldValue)>, name: &'static str, v: &Option<String>) {
    if let Some(v) = v {
        out.push((name, FieldValue::Text(v.clone())));
    }
}

fn push_integer(out: &mut Vec<(&'static str, FieldValue)>, name: &'static str, v: &Option<i64>) {
    if let Some(v) = v {
        out.push((name, FieldValue::Integer(*v)));
    }
}

fn push_embedding(out: &mut Vec<(&'static str, FieldValue)>, v: &Option<Vec<f64>>) {
    if let Some(v) = v {
        out.push(("embedding", FieldValue::Text(encode_embedding(v))));
    }
}

impl DocumentRecord {
    /// The table this record belongs to.
    pub fn table(&self) -> Table {
        match self {
            DocumentRecord::Session(_) => Table::Sessions,
            DocumentRecord::CaseStudy(_) => Table::CaseStudies,
            DocumentRecord::Protocol(_) => Table::Protocols,
            DocumentRecord::Capability(_) => Table::Capabilities,
            DocumentRecord::SystemDoc(_) => Table::SystemDocs,
        }
    }

    /// Unique sync key of the record.
    pub fn file_path(&self) -> &str {
        match self {
            DocumentRecord::Session(r) => &r.file_path,
            DocumentRecord::CaseStudy(r) => &r.file_path,
            DocumentRecord::Protocol(r) => &r.file_path,
            DocumentRecord::Capability(r) => &r.file_path,
            DocumentRecord::SystemDoc(r) => &r.file_path,
        }
    }

    /// The provided `(column, value)` pairs, with the embedding already
    /// serialized to its textual encoding. Absent fields are omitted.
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        let mut out = Vec::new();
        match self {
            DocumentRecord::Session(r) => {
                push_text(&mut out, "date", &r.date);
                push_integer(&mut out, "session_number", &r.session_number);
                push_text(&mut out, "title", &r.title);
                push_text(&mut out, "content", &r.content);
                push_embedding(&mut out, &r.embedding);
            }
            DocumentRecord::CaseStudy(r) => {
                push_text(&mut out, "case_id", &r.case_id);
                push_text(&mut out, "title", &r.title);
                push_text(&mut out, "content", &r.content);
                push_text(&mut out, "code", &r.code);
                push_embedding(&mut out, &r.embedding);
            }
            DocumentRecord::Protocol(r) => {
                push_text(&mut out, "protocol_id", &r.protocol_id);
                push_text(&mut out, "title", &r.title);
                push_text(&mut out, "content", &r.content);
                push_text(&mut out, "code", &r.code);
                push_embedding(&mut out, &r.embedding);
            }
            DocumentRecord::Capability(r) => {
                push_text(&mut out, "name", &r.name);
                push_text(&mut out, "content", &r.content);
                push_embedding(&mut out, &r.embedding);
            }
            DocumentRecord::SystemDoc(r) => {
                push_text(&mut out, "filename", &r.filename);
                push_text(&mut out, "doc_type", &r.doc_type);
                push_text(&mut out, "content", &r.content);
                push_embedding(&mut out, &r.embedding);
            }
        }
        out.push(("file_path", FieldValue::Text(self.file_path().to_string())));
        out
    }

    /// The record as a JSON object, columns as they will be stored.
    pub fn to_row(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (name, value) in self.fields() {
            map.insert(name.to_string(), Value::from(&value));
        }
        Value::Object(map)
    }
}

impl From<SessionRecord> for DocumentRecord {
    fn from(r: SessionRecord) -> Self {
        DocumentRecord::Session(r)
    }
}

impl From<CaseStudyRecord> for DocumentRecord {
    fn from(r: CaseStudyRecord) -> Self {
        DocumentRecord::CaseStudy(r)
    }
}

impl From<ProtocolRecord> for DocumentRecord {
    fn from(r: ProtocolRecord) -> Self {
        DocumentRecord::Protocol(r)
    }
}

impl From<CapabilityRecord> for DocumentRecord {
    fn from(r: CapabilityRecord) -> Self {
        DocumentRecord::Capability(r)
    }
}

impl From<SystemDocRecord> for DocumentRecord {
    fn from(r: SystemDocRecord) -> Self {
        DocumentRecord::SystemDoc(r)
    }
}
