//! On-disk graph document and summary statistics.

use serde::{Deserialize, Serialize};

use lattice_core::node::{DocumentChunk, Entity, Relationship};

/// The persisted graph: one structured document holding both node
/// collections and the relationship list. `chunks` is absent for
/// entity-only graphs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub chunks: Vec<DocumentChunk>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

/// Summary counts, used for load-time logging and health reporting.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphStats {
    pub entities: usize,
    pub chunks: usize,
    pub total_nodes: usize,
    pub relationships: usize,
    pub indexed_hashes: usize,
    pub entity_types: usize,
    pub chunks_with_mentions: usize,
}
