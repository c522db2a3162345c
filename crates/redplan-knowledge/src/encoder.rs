//! Hashing-trick text encoder
//!
//! Produces fixed-width embeddings without any model weights or random
//! state: each token is hashed once, the first digest word picks the target
//! dimension and the second derives a positive magnitude. Identical text
//! therefore always yields an identical vector, across processes and runs.

use crate::error::{KnowledgeError, Result};
use sha2::{Digest, Sha256};

/// Default embedding width
pub const DEFAULT_DIMENSIONS: usize = 64;

/// Deterministic fixed-width text encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingEncoder {
    dimensions: usize,
}

impl HashingEncoder {
    /// Create an encoder with the given embedding width
    ///
    /// # Errors
    /// Returns [`KnowledgeError::InvalidDimensions`] when `dimensions` is 0.
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(KnowledgeError::InvalidDimensions);
        }
        Ok(Self { dimensions })
    }

    /// Embedding width of vectors produced by this encoder
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Encode free text into an L2-normalized vector
    ///
    /// Text that tokenizes to nothing maps to the zero vector, which is the
    /// only non-unit vector this encoder produces.
    #[must_use]
    pub fn encode(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.dimensions];
        let mut empty = true;

        for token in tokenize(text) {
            empty = false;
            let digest = Sha256::digest(token.as_bytes());
            let index =
                u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) as usize
                    % self.dimensions;
            let raw = u32::from_be_bytes([digest[4], digest[5], digest[6], digest[7]]);
            let magnitude = f64::from(raw % 1000) / 1000.0 + 0.1;
            vector[index] += magnitude;
        }

        if empty {
            return vector;
        }

        let norm = vector.iter().map(|c| c * c).sum::<f64>().sqrt();
        if norm == 0.0 {
            return vector;
        }
        for component in &mut vector {
            *component /= norm;
        }
        vector
    }
}

impl Default for HashingEncoder {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
        }
    }
}

/// Cosine similarity between two vectors of equal width
///
/// Returns 0.0 when either vector has zero norm.
///
/// # Errors
/// Returns [`KnowledgeError::DimensionMismatch`] when widths differ.
pub fn cosine_similarity(lhs: &[f64], rhs: &[f64]) -> Result<f64> {
    if lhs.len() != rhs.len() {
        return Err(KnowledgeError::DimensionMismatch {
            lhs: lhs.len(),
            rhs: rhs.len(),
        });
    }

    let dot: f64 = lhs.iter().zip(rhs).map(|(x, y)| x * y).sum();
    let lhs_norm: f64 = lhs.iter().map(|x| x * x).sum::<f64>().sqrt();
    let rhs_norm: f64 = rhs.iter().map(|y| y * y).sum::<f64>().sqrt();

    if lhs_norm == 0.0 || rhs_norm == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (lhs_norm * rhs_norm))
}

/// Lower-case and delimiter-normalize text into tokens
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || matches!(c, '-' | '/' | '_' | ',' | '.'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>()
        .into_iter()
}
