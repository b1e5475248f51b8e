//! The graph store: lookup indexes, mention queries, bounded BFS traversal.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use tracing::info;

use lattice_core::errors::LatticeResult;
use lattice_core::hash::HashScheme;
use lattice_core::node::{DocumentChunk, Entity, NodeKind, NodeRef, Relationship};

use crate::document::{GraphDocument, GraphStats};

/// The relationship type carrying chunk→entity mention links. Edges of this
/// type connect chunks to entities, not concepts to concepts, so entity
/// traversal skips them.
pub const MENTIONS_TYPE: &str = "MENTIONS";

/// Owns the entity/chunk/relationship collections and all lookup indexes.
///
/// Entities missing a stored `embedding_hash` get one derived from their
/// trimmed label at load time; that is the only mutation, and it happens
/// before any query is served. Chunks without a hash are indexed by ID only.
pub struct GraphStore {
    entities: Vec<Entity>,
    chunks: Vec<DocumentChunk>,
    relationships: Vec<Relationship>,
    entity_ids: HashMap<String, usize>,
    entity_hashes: HashMap<String, usize>,
    chunk_ids: HashMap<String, usize>,
    chunk_hashes: HashMap<String, usize>,
    /// Unified hash index across both node collections, kind-tagged.
    node_hashes: HashMap<String, (NodeKind, usize)>,
}

impl GraphStore {
    /// Load the graph from a JSON document on disk.
    pub fn load(path: impl AsRef<Path>) -> LatticeResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let document: GraphDocument = serde_json::from_str(&raw)?;
        Ok(Self::from_document(document))
    }

    /// Build the store and its indexes from an already-parsed document.
    pub fn from_document(mut document: GraphDocument) -> Self {
        let mut entity_ids = HashMap::new();
        let mut entity_hashes = HashMap::new();
        let mut chunk_ids = HashMap::new();
        let mut chunk_hashes = HashMap::new();
        let mut node_hashes = HashMap::new();

        for (i, entity) in document.entities.iter_mut().enumerate() {
            entity_ids.insert(entity.id.clone(), i);

            // Legacy graphs predate stored hashes; derive from the label so
            // hash-based retrieval still succeeds.
            let hash = match &entity.embedding_hash {
                Some(h) => h.clone(),
                None => {
                    let derived = HashScheme::NODE.derive(entity.embedding_text());
                    entity.embedding_hash = Some(derived.clone());
                    derived
                }
            };
            entity_hashes.insert(hash.clone(), i);
            node_hashes.insert(hash, (NodeKind::Entity, i));
        }

        for (i, chunk) in document.chunks.iter().enumerate() {
            chunk_ids.insert(chunk.id.clone(), i);
            if let Some(hash) = &chunk.embedding_hash {
                chunk_hashes.insert(hash.clone(), i);
                node_hashes.insert(hash.clone(), (NodeKind::Chunk, i));
            }
        }

        info!(
            entities = document.entities.len(),
            chunks = document.chunks.len(),
            relationships = document.relationships.len(),
            "graph loaded"
        );

        Self {
            entities: document.entities,
            chunks: document.chunks,
            relationships: document.relationships,
            entity_ids,
            entity_hashes,
            chunk_ids,
            chunk_hashes,
            node_hashes,
        }
    }

    // ---- hash-based lookups ------------------------------------------------

    /// Any node (entity or chunk) by embedding hash, kind-tagged.
    pub fn node_by_hash(&self, hash: &str) -> Option<NodeRef<'_>> {
        self.node_hashes.get(hash).map(|&(kind, i)| match kind {
            NodeKind::Entity => NodeRef::Entity(&self.entities[i]),
            NodeKind::Chunk => NodeRef::Chunk(&self.chunks[i]),
        })
    }

    pub fn entity_by_hash(&self, hash: &str) -> Option<&Entity> {
        self.entity_hashes.get(hash).map(|&i| &self.entities[i])
    }

    pub fn chunk_by_hash(&self, hash: &str) -> Option<&DocumentChunk> {
        self.chunk_hashes.get(hash).map(|&i| &self.chunks[i])
    }

    // ---- ID-based lookups --------------------------------------------------

    pub fn entity_by_id(&self, id: &str) -> Option<&Entity> {
        self.entity_ids.get(id).map(|&i| &self.entities[i])
    }

    pub fn chunk_by_id(&self, id: &str) -> Option<&DocumentChunk> {
        self.chunk_ids.get(id).map(|&i| &self.chunks[i])
    }

    /// Any node by ID; the entity namespace is checked first.
    pub fn node_by_id(&self, id: &str) -> Option<NodeRef<'_>> {
        self.entity_by_id(id)
            .map(NodeRef::Entity)
            .or_else(|| self.chunk_by_id(id).map(NodeRef::Chunk))
    }

    // ---- relationship queries ----------------------------------------------

    /// All relationships touching `node_id` as either endpoint, optionally
    /// filtered by type. Linear scan; the corpora this serves hold a few
    /// thousand edges.
    pub fn relationships_for(
        &self,
        node_id: &str,
        type_filter: Option<&str>,
    ) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|rel| type_filter.map_or(true, |t| rel.rel_type == t))
            .filter(|rel| rel.from == node_id || rel.to == node_id)
            .collect()
    }

    /// Chunks whose text mentions `entity_id`, merging two signals: explicit
    /// MENTIONS relationships (chunk as source) and each chunk's own
    /// `mentions_entities` field. Either may be the more complete source;
    /// a chunk present in both appears once.
    pub fn chunks_mentioning(&self, entity_id: &str) -> Vec<&DocumentChunk> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut chunks = Vec::new();

        for rel in &self.relationships {
            if rel.rel_type == MENTIONS_TYPE && rel.to == entity_id {
                if let Some(chunk) = self.chunk_by_id(&rel.from) {
                    if seen.insert(&chunk.id) {
                        chunks.push(chunk);
                    }
                }
            }
        }

        for chunk in &self.chunks {
            if chunk.mentions_entities.iter().any(|id| id == entity_id)
                && seen.insert(&chunk.id)
            {
                chunks.push(chunk);
            }
        }

        chunks
    }

    /// Entities mentioned in `chunk_id`. The chunk's own field is preferred;
    /// the relationship scan is a fallback used only when the field yields
    /// nothing.
    pub fn entities_mentioned_in(&self, chunk_id: &str) -> Vec<&Entity> {
        let mut entities = Vec::new();

        if let Some(chunk) = self.chunk_by_id(chunk_id) {
            for entity_id in &chunk.mentions_entities {
                if let Some(entity) = self.entity_by_id(entity_id) {
                    entities.push(entity);
                }
            }
        }

        if entities.is_empty() {
            for rel in &self.relationships {
                if rel.rel_type == MENTIONS_TYPE && rel.from == chunk_id {
                    if let Some(entity) = self.entity_by_id(&rel.to) {
                        entities.push(entity);
                    }
                }
            }
        }

        entities
    }

    /// Breadth-first traversal over entity↔entity edges, up to `max_depth`
    /// hops from `entity_id`. MENTIONS edges are excluded (they connect
    /// chunks, not concepts). Returns entities in discovery order, without
    /// the start node. `max_depth < 1` returns an empty list.
    pub fn related_entities(&self, entity_id: &str, max_depth: usize) -> Vec<&Entity> {
        if max_depth < 1 {
            return Vec::new();
        }

        let mut related = Vec::new();
        let mut visited: HashSet<&str> = HashSet::from([entity_id]);
        let mut queue: VecDeque<(&str, usize)> = VecDeque::from([(entity_id, 0)]);

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }

            for rel in &self.relationships {
                if rel.rel_type == MENTIONS_TYPE {
                    continue;
                }

                let neighbor = if rel.from == current {
                    rel.to.as_str()
                } else if rel.to == current {
                    rel.from.as_str()
                } else {
                    continue;
                };

                if visited.contains(neighbor) {
                    continue;
                }
                // Only entity endpoints extend the frontier.
                if let Some(entity) = self.entity_by_id(neighbor) {
                    visited.insert(&entity.id);
                    related.push(entity);
                    queue.push_back((&entity.id, depth + 1));
                }
            }
        }

        related
    }

    // ---- predicate scans ---------------------------------------------------

    pub fn entities_by_type(&self, entity_type: &str) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|e| e.entity_type == entity_type)
            .collect()
    }

    pub fn chunks_by_source(&self, source_file: &str) -> Vec<&DocumentChunk> {
        self.chunks
            .iter()
            .filter(|c| c.source_file == source_file)
            .collect()
    }

    // ---- keyword fallback search ---------------------------------------------

    /// Case-insensitive substring scan over label, description, and aliases.
    /// Short-circuits at `limit`; results are in iteration order, not
    /// relevance order. A coarse fallback, not the primary search path.
    pub fn search_entities(&self, keyword: &str, limit: usize) -> Vec<&Entity> {
        let needle = keyword.to_lowercase();
        let mut results = Vec::new();

        for entity in &self.entities {
            if results.len() >= limit {
                break;
            }
            let hit = entity.label.to_lowercase().contains(&needle)
                || entity.description.to_lowercase().contains(&needle)
                || entity
                    .aliases
                    .iter()
                    .any(|a| a.to_lowercase().contains(&needle));
            if hit {
                results.push(entity);
            }
        }

        results
    }

    /// Case-insensitive substring scan over chunk text, short-circuiting at
    /// `limit`.
    pub fn search_chunks(&self, keyword: &str, limit: usize) -> Vec<&DocumentChunk> {
        let needle = keyword.to_lowercase();
        let mut results = Vec::new();

        for chunk in &self.chunks {
            if results.len() >= limit {
                break;
            }
            if chunk.text.to_lowercase().contains(&needle) {
                results.push(chunk);
            }
        }

        results
    }

    // ---- accessors -----------------------------------------------------------

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn chunks(&self) -> &[DocumentChunk] {
        &self.chunks
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn stats(&self) -> GraphStats {
        let entity_types: HashSet<&str> = self
            .entities
            .iter()
            .map(|e| e.entity_type.as_str())
            .collect();
        GraphStats {
            entities: self.entities.len(),
            chunks: self.chunks.len(),
            total_nodes: self.entities.len() + self.chunks.len(),
            relationships: self.relationships.len(),
            indexed_hashes: self.node_hashes.len(),
            entity_types: entity_types.len(),
            chunks_with_mentions: self
                .chunks
                .iter()
                .filter(|c| !c.mentions_entities.is_empty())
                .count(),
        }
    }
}
