//! Cosine similarity between embedding vectors.

use localbase_types::error::SimilarityError;

/// Cosine similarity: dot product over the product of Euclidean norms.
///
/// Either norm exactly zero yields `0.0`: a null vector is treated as
/// maximally dissimilar rather than undefined. Vectors of different length
/// are a defined error, never silently truncated. Output is nominally in
/// `[-1, 1]`; no clamping is applied.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a * norm_b))
}
