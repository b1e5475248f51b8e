//! Query parameters for the dual-source retrieval pipeline.

use serde::{Deserialize, Serialize};

use crate::errors::{LatticeError, LatticeResult};

/// Tunable parameters for one retrieval query.
///
/// The weights bias the rerank between conceptual definitions
/// (`entity_weight > chunk_weight`) and narrative evidence
/// (`chunk_weight > entity_weight`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryParams {
    /// Natural-language question. Must be non-empty.
    pub query: String,
    /// Total results to retrieve after reranking, in `[1, 20]`.
    pub top_k: usize,
    /// Multiplier applied to entity similarity scores, in `[0.1, 2.0]`.
    pub entity_weight: f32,
    /// Multiplier applied to chunk similarity scores, in `[0.1, 2.0]`.
    pub chunk_weight: f32,
    /// Whether to enrich the context with graph relationships.
    pub include_relationships: bool,
    /// Similarity floor applied before reranking, in `[0.0, 1.0]`.
    pub min_similarity: f32,
    /// Attach per-query diagnostics to the response.
    pub debug: bool,
}

impl QueryParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Check every parameter against its documented bounds.
    pub fn validate(&self) -> LatticeResult<()> {
        fn fail(reason: impl Into<String>) -> LatticeResult<()> {
            Err(LatticeError::InvalidParams {
                reason: reason.into(),
            })
        }

        if self.query.trim().is_empty() {
            return fail("query must be non-empty");
        }
        if !(1..=20).contains(&self.top_k) {
            return fail(format!("top_k {} outside [1, 20]", self.top_k));
        }
        if !(0.1..=2.0).contains(&self.entity_weight) {
            return fail(format!(
                "entity_weight {} outside [0.1, 2.0]",
                self.entity_weight
            ));
        }
        if !(0.1..=2.0).contains(&self.chunk_weight) {
            return fail(format!(
                "chunk_weight {} outside [0.1, 2.0]",
                self.chunk_weight
            ));
        }
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return fail(format!(
                "min_similarity {} outside [0.0, 1.0]",
                self.min_similarity
            ));
        }
        Ok(())
    }
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            top_k: 7,
            entity_weight: 1.0,
            chunk_weight: 1.0,
            include_relationships: true,
            min_similarity: 0.05,
            debug: false,
        }
    }
}
