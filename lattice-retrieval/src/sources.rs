//! Citation formatting: ranked results → typed source records.
//!
//! Absent fields are omitted, never emitted as null — consumers key off the
//! `type` discriminant only.

use lattice_core::node::NodeRef;
use lattice_core::response::SourceRecord;
use lattice_graph::GraphStore;

use crate::engine::ScoredNode;

/// Entity descriptions are cut to this many characters.
const DESCRIPTION_LIMIT: usize = 200;
/// Chunk previews are cut to this many characters before collapsing.
const PREVIEW_LIMIT: usize = 250;
/// At most this many mentioned-entity labels per chunk record.
const MENTION_LABEL_LIMIT: usize = 5;

/// One citation record per ranked result, in rank order.
pub fn format(results: &[ScoredNode<'_>], graph: &GraphStore) -> Vec<SourceRecord> {
    results
        .iter()
        .map(|result| match result.node {
            NodeRef::Entity(entity) => SourceRecord::Entity {
                entity_id: entity.id.clone(),
                label: entity.label.clone(),
                entity_type: entity.entity_type.clone(),
                description: truncate_chars(&entity.description, DESCRIPTION_LIMIT),
                source_urls: entity.source_urls(),
            },
            NodeRef::Chunk(chunk) => {
                let mentioned: Vec<String> = chunk
                    .mentions_entities
                    .iter()
                    .take(MENTION_LABEL_LIMIT)
                    .filter_map(|id| graph.entity_by_id(id))
                    .map(|e| e.label.clone())
                    .collect();

                SourceRecord::Chunk {
                    chunk_id: chunk.id.clone(),
                    source_file: chunk.source_file.clone(),
                    chunk_index: chunk.chunk_index,
                    text_preview: preview(&chunk.text),
                    mentioned_entities: if mentioned.is_empty() {
                        None
                    } else {
                        Some(mentioned)
                    },
                }
            }
        })
        .collect()
}

/// Whitespace-collapsed first [`PREVIEW_LIMIT`] characters, with a trailing
/// ellipsis when the text was cut.
fn preview(text: &str) -> String {
    let head = truncate_chars(text, PREVIEW_LIMIT);
    let mut collapsed = head.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() > PREVIEW_LIMIT {
        collapsed.push_str("...");
    }
    collapsed
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
