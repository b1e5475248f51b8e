//! Graph node types: entities, document chunks, relationships.
//!
//! Entities and chunks share one ID namespace for relationship purposes.
//! All nodes are built offline and immutable during query serving.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A typed concept node in the knowledge graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    /// Unique across the entire node space (entities and chunks).
    pub id: String,
    /// Category tag (company, market, brand, ...).
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Display name; also the text an entity's embedding hash is derived from.
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// Ordered list of alternate names.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Open extension data. The core only reads `source_urls`.
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Stored hash is the source of truth; derived from the label when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_hash: Option<String>,
}

impl Entity {
    /// The text an entity's embedding (and derived hash) is computed from.
    pub fn embedding_text(&self) -> &str {
        self.label.trim()
    }

    /// Citation URLs from the open property map, if present.
    pub fn source_urls(&self) -> Option<String> {
        self.properties
            .get("source_urls")
            .and_then(|v| v.as_str())
            .map(String::from)
    }
}

/// A bounded passage of source text, retrievable alongside entities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentChunk {
    pub id: String,
    /// Raw passage text.
    pub text: String,
    #[serde(default)]
    pub source_file: String,
    /// Position within the source file.
    #[serde(default)]
    pub chunk_index: usize,
    /// Entity IDs detected in the text by the offline linking job.
    #[serde(default)]
    pub mentions_entities: Vec<String>,
    /// Must resolve against the vector index for the chunk to be retrievable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_hash: Option<String>,
}

/// A directed, typed edge between two node IDs.
///
/// The on-disk format writes the source field as `from_`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    #[serde(rename = "from_", alias = "from")]
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Discriminant for the two node collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Entity,
    Chunk,
}

/// A kind-tagged borrow of a node, as returned by hash/ID lookups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Entity(&'a Entity),
    Chunk(&'a DocumentChunk),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Entity(_) => NodeKind::Entity,
            NodeRef::Chunk(_) => NodeKind::Chunk,
        }
    }

    pub fn id(&self) -> &'a str {
        match self {
            NodeRef::Entity(e) => &e.id,
            NodeRef::Chunk(c) => &c.id,
        }
    }

    pub fn as_entity(&self) -> Option<&'a Entity> {
        match self {
            NodeRef::Entity(e) => Some(e),
            NodeRef::Chunk(_) => None,
        }
    }

    pub fn as_chunk(&self) -> Option<&'a DocumentChunk> {
        match self {
            NodeRef::Chunk(c) => Some(c),
            NodeRef::Entity(_) => None,
        }
    }
}
