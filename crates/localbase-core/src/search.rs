//! Ranking pipeline for the similarity search RPC emulation.
//!
//! Scores a full-table scan against a query embedding, filters by
//! threshold, and orders the survivors. One undecodable row never aborts
//! the scan; it is counted so the caller can log the skip.

use serde_json::Value;
use tracing::debug;

use localbase_types::record::decode_embedding;

use crate::similarity::cosine_similarity;

/// Default similarity threshold, matching the remote search functions.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.3;

/// Default result limit.
pub const DEFAULT_MATCH_COUNT: usize = 5;

/// Parameters of a search RPC call.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query_embedding: Vec<f64>,
    pub match_threshold: f64,
    pub match_count: usize,
}

impl SearchParams {
    /// Parameters with the default threshold (0.3) and limit (5).
    pub fn new(query_embedding: Vec<f64>) -> Self {
        Self {
            query_embedding,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            match_count: DEFAULT_MATCH_COUNT,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.match_count = limit;
        self
    }
}

/// Outcome of ranking one table scan.
#[derive(Debug)]
pub struct Ranking {
    /// Surviving rows, similarity descending, enriched with a `similarity`
    /// field and stripped of their raw `embedding`.
    pub hits: Vec<Value>,
    /// Rows dropped because their embedding could not be decoded or scored.
    pub skipped: usize,
}

struct ScoredRow {
    similarity: f64,
    id: i64,
    row: Value,
}

/// Score `rows` against the query embedding and keep those strictly above
/// the threshold. Rows without an embedding are excluded quietly; rows
/// whose embedding fails to decode or score are excluded and counted.
pub fn rank_rows(rows: Vec<Value>, params: &SearchParams) -> Ranking {
    let mut skipped = 0usize;
    let mut scored: Vec<ScoredRow> = Vec::new();

    for row in rows {
        let encoded = match row.get("embedding") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            None | Some(Value::Null) => continue,
            Some(Value::String(_)) => continue,
            Some(_) => {
                // A non-text embedding column means a corrupt row.
                skipped += 1;
                continue;
            }
        };

        let embedding = match decode_embedding(&encoded) {
            Ok(embedding) => embedding,
            Err(error) => {
                debug!(%error, "dropping row with malformed embedding");
                skipped += 1;
                continue;
            }
        };

        let similarity = match cosine_similarity(&params.query_embedding, &embedding) {
            Ok(similarity) => similarity,
            Err(error) => {
                debug!(%error, "dropping row that failed scoring");
                skipped += 1;
                continue;
            }
        };

        if similarity > params.match_threshold {
            // Missing ids sort after every real row.
            let id = row.get("id").and_then(Value::as_i64).unwrap_or(i64::MAX);
            let mut row = row;
            if let Some(object) = row.as_object_mut() {
                object.remove("embedding");
                object.insert("similarity".to_string(), Value::from(similarity));
            }
            scored.push(ScoredRow {
                similarity,
                id,
                row,
            });
        }
    }

    // Similarity descending, ties broken by id ascending for determinism.
    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    scored.truncate(params.match_count);

    Ranking {
        hits: scored.into_iter().map(|s| s.row).collect(),
        skipped,
    }
}
