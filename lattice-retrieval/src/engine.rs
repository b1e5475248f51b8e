//! The dual-source retrieval engine: one vector query, split into weighted
//! entity and chunk pools, merged, reranked, and answered.
//!
//! Pipeline: validate → embed → vector search (2× over-fetch) → resolve
//! hashes against the graph → weight pools → rerank → context → generate →
//! cite.

use tracing::{debug, info, warn};

use lattice_core::errors::LatticeResult;
use lattice_core::node::{NodeKind, NodeRef};
use lattice_core::params::QueryParams;
use lattice_core::response::{DebugInfo, QueryResponse, SimilarityEntry, TypeBreakdown};
use lattice_core::traits::{EmbeddingProvider, ResponseGenerator};
use lattice_graph::GraphStore;
use lattice_index::VectorIndex;

use crate::{context, sources};

/// Fixed answer returned when nothing survives retrieval. The generation
/// step is never invoked in that case.
pub const NO_RESULTS_ANSWER: &str = "I couldn't find any relevant information in the \
knowledge graph to answer your question. Please try rephrasing the question.";

/// A resolved, weighted candidate in the rerank pool.
#[derive(Debug, Clone, Copy)]
pub struct ScoredNode<'a> {
    pub node: NodeRef<'a>,
    /// Cosine similarity multiplied by the pool weight.
    pub score: f32,
}

/// Request-scoped orchestration over the shared, read-only stores.
///
/// Holds references only; all per-query scratch state is local to
/// [`RetrievalEngine::query`], so concurrent queries may share one engine.
pub struct RetrievalEngine<'a> {
    graph: &'a GraphStore,
    index: &'a VectorIndex,
    embedder: &'a dyn EmbeddingProvider,
    generator: &'a dyn ResponseGenerator,
}

impl<'a> RetrievalEngine<'a> {
    pub fn new(
        graph: &'a GraphStore,
        index: &'a VectorIndex,
        embedder: &'a dyn EmbeddingProvider,
        generator: &'a dyn ResponseGenerator,
    ) -> Self {
        Self {
            graph,
            index,
            embedder,
            generator,
        }
    }

    /// Run the full dual-source pipeline for one query.
    pub fn query(&self, params: &QueryParams) -> LatticeResult<QueryResponse> {
        params.validate()?;
        info!(top_k = params.top_k, "processing query");

        let query_embedding = self.embedder.embed(&params.query)?;

        // Over-fetch so both pools have rerank headroom before truncation.
        let candidate_count = params.top_k * 2;
        let hits = self
            .index
            .search(&query_embedding, candidate_count, params.min_similarity)?;

        // Resolve hashes and split into weighted pools. A vector with no
        // matching node is expected data skew, not an error.
        let mut entity_pool: Vec<ScoredNode<'a>> = Vec::new();
        let mut chunk_pool: Vec<ScoredNode<'a>> = Vec::new();
        for (hash, similarity) in &hits {
            match self.graph.node_by_hash(hash) {
                Some(node @ NodeRef::Entity(_)) => entity_pool.push(ScoredNode {
                    node,
                    score: similarity * params.entity_weight,
                }),
                Some(node @ NodeRef::Chunk(_)) => chunk_pool.push(ScoredNode {
                    node,
                    score: similarity * params.chunk_weight,
                }),
                None => debug!(hash = %hash, "vector hash has no graph node, dropped"),
            }
        }

        let entity_count = entity_pool.len();
        let chunk_count = chunk_pool.len();

        // The single fusion step: concatenate, sort by weighted score, cut.
        let mut combined = entity_pool;
        combined.append(&mut chunk_pool);
        combined.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        combined.truncate(params.top_k);

        info!(
            entities = entity_count,
            chunks = chunk_count,
            reranked = combined.len(),
            "dual-source retrieval"
        );

        if combined.is_empty() {
            let debug_info = params.debug.then(DebugInfo::default);
            return Ok(QueryResponse {
                answer: NO_RESULTS_ANSWER.to_string(),
                sources: Vec::new(),
                debug: debug_info,
            });
        }

        let context = context::build(&combined, self.graph, params.include_relationships);

        // Generation failure degrades into the answer text; the retrieval
        // result is still returned with its sources.
        let answer = match self.generator.generate(&params.query, &context) {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %err, "generation failed, degrading");
                format!("I encountered an error generating a response: {err}")
            }
        };

        let sources = sources::format(&combined, self.graph);
        let debug_info = params
            .debug
            .then(|| build_debug(&combined, entity_count, chunk_count, context.chars().count()));

        Ok(QueryResponse {
            answer,
            sources,
            debug: debug_info,
        })
    }
}

fn build_debug(
    results: &[ScoredNode<'_>],
    entity_count: usize,
    chunk_count: usize,
    context_length: usize,
) -> DebugInfo {
    let breakdown = TypeBreakdown {
        entities: results
            .iter()
            .filter(|r| r.node.kind() == NodeKind::Entity)
            .count(),
        chunks: results
            .iter()
            .filter(|r| r.node.kind() == NodeKind::Chunk)
            .count(),
    };

    let similarities = results
        .iter()
        .map(|r| SimilarityEntry {
            kind: r.node.kind(),
            label: match r.node {
                NodeRef::Entity(e) => e.label.clone(),
                NodeRef::Chunk(c) => format!("Chunk {}", c.chunk_index),
            },
            similarity: (r.score * 1000.0).round() / 1000.0,
        })
        .collect();

    DebugInfo {
        entity_count,
        chunk_count,
        top_results_breakdown: breakdown,
        similarities,
        context_length,
    }
}
