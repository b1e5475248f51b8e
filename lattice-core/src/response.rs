//! Response model: answer text, typed source citations, optional diagnostics.
//!
//! Source records omit absent fields entirely rather than emitting nulls —
//! consumers must key off the `type` discriminant, not a fixed field set.

use serde::{Deserialize, Serialize};

use crate::node::NodeKind;

/// The result of one retrieval query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer, or a fixed fallback when nothing was retrieved.
    pub answer: String,
    /// One citation per ranked result, in rank order.
    pub sources: Vec<SourceRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

/// A typed citation, discriminated by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceRecord {
    Entity {
        entity_id: String,
        label: String,
        entity_type: String,
        /// Truncated to 200 characters.
        description: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        source_urls: Option<String>,
    },
    Chunk {
        chunk_id: String,
        source_file: String,
        chunk_index: usize,
        /// Whitespace-collapsed first 250 characters, `...`-terminated if cut.
        text_preview: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        mentioned_entities: Option<Vec<String>>,
    },
}

/// Per-query diagnostics, attached when `QueryParams::debug` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugInfo {
    /// Entity candidates resolved from the vector search, pre-rerank.
    pub entity_count: usize,
    /// Chunk candidates resolved from the vector search, pre-rerank.
    pub chunk_count: usize,
    /// Type breakdown of the post-rerank top-k.
    pub top_results_breakdown: TypeBreakdown,
    /// Per-result type, display label, and weighted similarity.
    pub similarities: Vec<SimilarityEntry>,
    /// Character length of the assembled context.
    pub context_length: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeBreakdown {
    pub entities: usize,
    pub chunks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityEntry {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Entity label, or `Chunk {index}` for chunk results.
    pub label: String,
    /// Weighted similarity, rounded to 3 decimals.
    pub similarity: f32,
}
