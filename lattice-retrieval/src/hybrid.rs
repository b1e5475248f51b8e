//! Hybrid entity search: vector similarity fused with keyword matching.
//!
//! The legacy single-source mode — it does not distinguish chunk candidates.
//! Per hash, the maximum score wins and its match type is kept.

use std::collections::HashMap;

use tracing::debug;

use lattice_core::errors::LatticeResult;
use lattice_graph::GraphStore;
use lattice_index::VectorIndex;

use crate::keyword::{self, MatchType};

/// A fused candidate: hash, winning score, and the source of that score.
#[derive(Debug, Clone)]
pub struct RankedMatch {
    pub hash: String,
    pub score: f32,
    pub match_type: MatchType,
}

/// Fuses vector index hits with keyword matches into one ranked list.
pub struct HybridRanker<'a> {
    graph: &'a GraphStore,
    index: &'a VectorIndex,
}

impl<'a> HybridRanker<'a> {
    pub fn new(graph: &'a GraphStore, index: &'a VectorIndex) -> Self {
        Self { graph, index }
    }

    /// Run both searches independently and merge by hash, taking the
    /// maximum score per hash. Descending by score, truncated to `top_k`;
    /// ties keep first-contribution order.
    pub fn search(
        &self,
        query: &str,
        query_embedding: &[f32],
        top_k: usize,
        min_similarity: f32,
    ) -> LatticeResult<Vec<RankedMatch>> {
        let mut merged: Vec<RankedMatch> = Vec::new();
        let mut by_hash: HashMap<String, usize> = HashMap::new();

        let vector_hits = self.index.search(query_embedding, top_k, min_similarity)?;
        let vector_count = vector_hits.len();
        for (hash, score) in vector_hits {
            upsert_max(&mut merged, &mut by_hash, hash, score, MatchType::Vector);
        }

        let keyword_hits = keyword::match_entities(self.graph, query);
        let keyword_count = keyword_hits.len();
        for hit in keyword_hits {
            upsert_max(&mut merged, &mut by_hash, hit.hash, hit.score, hit.match_type);
        }

        merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        merged.truncate(top_k);

        debug!(
            vector = vector_count,
            keyword = keyword_count,
            fused = merged.len(),
            "hybrid search"
        );

        Ok(merged)
    }
}

fn upsert_max(
    merged: &mut Vec<RankedMatch>,
    by_hash: &mut HashMap<String, usize>,
    hash: String,
    score: f32,
    match_type: MatchType,
) {
    match by_hash.get(&hash) {
        Some(&i) => {
            if merged[i].score < score {
                merged[i].score = score;
                merged[i].match_type = match_type;
            }
        }
        None => {
            by_hash.insert(hash.clone(), merged.len());
            merged.push(RankedMatch {
                hash,
                score,
                match_type,
            });
        }
    }
}
