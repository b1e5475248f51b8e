//! Context assembly: ranked results → one structured text block for the
//! generation step.

use std::collections::HashSet;

use lattice_core::node::NodeRef;
use lattice_graph::GraphStore;

use crate::engine::ScoredNode;

/// Relationship section covers at most this many retrieved entities.
const RELATIONSHIP_ENTITY_LIMIT: usize = 3;
/// At most this many related entities are listed per covered entity.
const RELATED_PER_ENTITY: usize = 5;
/// At most this many mentioned-entity labels are resolved per chunk.
const MENTION_LABEL_LIMIT: usize = 5;

/// Render the ranked results as numbered context blocks, followed by an
/// optional relationship section.
pub fn build(results: &[ScoredNode<'_>], graph: &GraphStore, include_relationships: bool) -> String {
    let mut out = String::from("# Retrieved Information\n\n");

    // Entities in rank order, deduplicated, for the relationship section.
    let mut seen_entities: Vec<&str> = Vec::new();
    let mut seen_set: HashSet<&str> = HashSet::new();

    for (i, result) in results.iter().enumerate() {
        let rank = i + 1;
        match result.node {
            NodeRef::Entity(entity) => {
                if seen_set.insert(&entity.id) {
                    seen_entities.push(&entity.id);
                }

                out.push_str(&format!(
                    "## Entity {rank}: {} ({})\n",
                    entity.label, entity.entity_type
                ));
                out.push_str(&format!("**Relevance:** {:.2}\n\n", result.score));

                if !entity.description.is_empty() {
                    out.push_str(&format!("{}\n\n", entity.description));
                }
                if !entity.aliases.is_empty() {
                    out.push_str(&format!(
                        "*Also known as:* {}\n\n",
                        entity.aliases.join(", ")
                    ));
                }

                // Count only — inlining chunk text here would blow up the
                // context size.
                if include_relationships {
                    let mentions = graph.chunks_mentioning(&entity.id);
                    if !mentions.is_empty() {
                        out.push_str(&format!(
                            "*Mentioned in {} document section(s)*\n\n",
                            mentions.len()
                        ));
                    }
                }
            }
            NodeRef::Chunk(chunk) => {
                out.push_str(&format!("## Document Excerpt {rank}\n"));
                out.push_str(&format!("**Source:** {}\n", chunk.source_file));
                out.push_str(&format!("**Chunk:** {}\n", chunk.chunk_index));
                out.push_str(&format!("**Relevance:** {:.2}\n\n", result.score));
                out.push_str(&format!("{}\n\n", chunk.text));

                let labels: Vec<&str> = chunk
                    .mentions_entities
                    .iter()
                    .take(MENTION_LABEL_LIMIT)
                    .filter_map(|id| graph.entity_by_id(id))
                    .map(|e| e.label.as_str())
                    .collect();
                if !labels.is_empty() {
                    out.push_str(&format!("*Mentions:* {}\n\n", labels.join(", ")));
                }
            }
        }
        out.push_str("---\n\n");
    }

    if include_relationships && !seen_entities.is_empty() {
        let section = relationship_section(&seen_entities, graph);
        if !section.is_empty() {
            out.push_str("# Entity Relationships\n\n");
            out.push_str(&section);
        }
    }

    out
}

/// Depth-1 neighbors for up to the first few retrieved entities, as
/// `label (type)` bullets. Empty when nothing is related.
fn relationship_section(entity_ids: &[&str], graph: &GraphStore) -> String {
    let mut out = String::new();

    for entity_id in entity_ids.iter().take(RELATIONSHIP_ENTITY_LIMIT) {
        let Some(entity) = graph.entity_by_id(entity_id) else {
            continue;
        };
        let related = graph.related_entities(entity_id, 1);
        if related.is_empty() {
            continue;
        }

        out.push_str(&format!("**{}** is connected to:\n", entity.label));
        for neighbor in related.iter().take(RELATED_PER_ENTITY) {
            out.push_str(&format!("- {} ({})\n", neighbor.label, neighbor.entity_type));
        }
        out.push('\n');
    }

    out
}
