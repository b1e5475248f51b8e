//! Cosine-similarity search over a fixed corpus of hash-keyed vectors.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use lattice_core::errors::{LatticeError, LatticeResult};

/// The full corpus of precomputed embedding vectors, keyed by content hash.
///
/// Built once at startup and immutable afterwards. All corpus vectors are
/// normalized at construction; queries are normalized per call.
#[derive(Debug)]
pub struct VectorIndex {
    /// Hashes in corpus document order — the stable tie-break order.
    hashes: Vec<String>,
    /// Original (un-normalized) vectors, parallel to `hashes`.
    vectors: Vec<Vec<f32>>,
    /// L2-normalized vectors, parallel to `hashes`.
    normalized: Vec<Vec<f32>>,
    /// Hash → position in the parallel arrays.
    positions: HashMap<String, usize>,
    dimensions: usize,
}

impl VectorIndex {
    /// Build an index from `(hash, vector)` entries, preserving input order.
    ///
    /// Fails if vector dimensionality is not uniform, or if any vector has
    /// zero norm (such a vector cannot participate in cosine similarity).
    pub fn from_entries(entries: Vec<(String, Vec<f32>)>) -> LatticeResult<Self> {
        let dimensions = entries.first().map(|(_, v)| v.len()).unwrap_or(0);

        let mut hashes = Vec::with_capacity(entries.len());
        let mut vectors = Vec::with_capacity(entries.len());
        let mut normalized = Vec::with_capacity(entries.len());
        let mut positions = HashMap::with_capacity(entries.len());

        for (hash, vector) in entries {
            if vector.len() != dimensions {
                return Err(LatticeError::DimensionMismatch {
                    expected: dimensions,
                    actual: vector.len(),
                    hash,
                });
            }
            let norm = l2_norm(&vector);
            if norm == 0.0 || !norm.is_finite() {
                return Err(LatticeError::InvalidVector {
                    hash,
                    reason: format!("norm {norm} is not usable"),
                });
            }
            normalized.push(vector.iter().map(|x| x / norm).collect());
            positions.insert(hash.clone(), hashes.len());
            hashes.push(hash);
            vectors.push(vector);
        }

        info!(
            vectors = hashes.len(),
            dimensions, "vector index built"
        );

        Ok(Self {
            hashes,
            vectors,
            normalized,
            positions,
            dimensions,
        })
    }

    /// Load the corpus from a JSON document mapping hash → vector.
    ///
    /// Document order is preserved and becomes the tie-break order.
    pub fn load(path: impl AsRef<Path>) -> LatticeResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let map: serde_json::Map<String, Value> = serde_json::from_str(&raw)?;

        let mut entries = Vec::with_capacity(map.len());
        for (hash, value) in map {
            let vector: Vec<f32> = serde_json::from_value(value)?;
            entries.push((hash, vector));
        }
        Self::from_entries(entries)
    }

    /// Top-k cosine-similarity search.
    ///
    /// Returns `(hash, score)` pairs in descending score order; ties keep
    /// corpus order. When `min_similarity > 0`, hashes scoring below the
    /// threshold are dropped before truncation — fewer than `top_k`
    /// survivors are returned as-is, never padded.
    pub fn search(
        &self,
        query: &[f32],
        top_k: usize,
        min_similarity: f32,
    ) -> LatticeResult<Vec<(String, f32)>> {
        if self.hashes.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimensions {
            return Err(LatticeError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
                hash: "<query>".into(),
            });
        }

        let norm = l2_norm(query);
        if norm == 0.0 || !norm.is_finite() {
            warn!("query vector has zero norm, returning no results");
            return Ok(Vec::new());
        }
        let query_normalized: Vec<f32> = query.iter().map(|x| x / norm).collect();

        let mut scored: Vec<(usize, f32)> = self
            .normalized
            .iter()
            .enumerate()
            .map(|(i, v)| (i, dot(v, &query_normalized)))
            .filter(|(_, score)| min_similarity <= 0.0 || *score >= min_similarity)
            .collect();

        // Stable sort: equal scores keep corpus order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        debug!(results = scored.len(), top_k, min_similarity, "vector search");

        Ok(scored
            .into_iter()
            .map(|(i, score)| (self.hashes[i].clone(), score))
            .collect())
    }

    /// The original (un-normalized) vector stored for `hash`.
    pub fn get(&self, hash: &str) -> Option<&[f32]> {
        self.positions.get(hash).map(|&i| self.vectors[i].as_slice())
    }

    /// The normalized form stored for `hash`.
    pub fn get_normalized(&self, hash: &str) -> Option<&[f32]> {
        self.positions
            .get(hash)
            .map(|&i| self.normalized[i].as_slice())
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.positions.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
