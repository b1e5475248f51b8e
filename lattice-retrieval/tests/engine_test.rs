//! End-to-end dual-source retrieval scenarios against toy fixtures with
//! hand-picked similarities.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Map;

use lattice_core::errors::{LatticeError, LatticeResult};
use lattice_core::hash::HashScheme;
use lattice_core::node::{DocumentChunk, Entity, NodeKind, Relationship};
use lattice_core::params::QueryParams;
use lattice_core::response::SourceRecord;
use lattice_core::traits::{EmbeddingProvider, ResponseGenerator};
use lattice_graph::{GraphDocument, GraphStore};
use lattice_index::VectorIndex;
use lattice_retrieval::{RetrievalEngine, NO_RESULTS_ANSWER};

// ---------------------------------------------------------------------------
// Stub collaborators
// ---------------------------------------------------------------------------

/// Returns one fixed vector for every text.
struct FixedEmbedder(Vec<f32>);

impl EmbeddingProvider for FixedEmbedder {
    fn embed(&self, _text: &str) -> LatticeResult<Vec<f32>> {
        Ok(self.0.clone())
    }

    fn dimensions(&self) -> usize {
        self.0.len()
    }
}

/// Counts calls; optionally fails every call.
#[derive(Default)]
struct CountingGenerator {
    calls: AtomicUsize,
    fail: bool,
}

impl ResponseGenerator for CountingGenerator {
    fn generate(&self, _query: &str, context: &str) -> LatticeResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LatticeError::Generation {
                reason: "upstream unavailable".into(),
            });
        }
        Ok(format!("answer grounded in {} chars", context.len()))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 2-D unit-circle vector whose cosine similarity to `[1, 0]` is `s`.
fn vec_with_similarity(s: f32) -> Vec<f32> {
    vec![s, (1.0 - s * s).max(0.0).sqrt()]
}

fn entity(id: &str, label: &str, entity_type: &str) -> Entity {
    Entity {
        id: id.into(),
        entity_type: entity_type.into(),
        label: label.into(),
        description: format!("{label} description"),
        aliases: Vec::new(),
        properties: Map::new(),
        embedding_hash: None,
    }
}

fn mentions(from_chunk: &str, to_entity: &str) -> Relationship {
    Relationship {
        from: from_chunk.into(),
        to: to_entity.into(),
        rel_type: "MENTIONS".into(),
        properties: Map::new(),
    }
}

/// Graph: PlayStation —OWNED_BY→ Sony India, one chunk mentioning
/// PlayStation. Corpus similarities to the query: PlayStation 0.95,
/// chunk 0.80, Sony India 0.40.
fn toy_world() -> (GraphStore, VectorIndex) {
    let chunk = DocumentChunk {
        id: "c-ps".into(),
        text: "PlayStation shipments in India grew 25% year over year.".into(),
        source_file: "console_report.md".into(),
        chunk_index: 4,
        mentions_entities: vec!["e-ps".into()],
        embedding_hash: Some("hash-c-ps".into()),
    };

    let graph = GraphStore::from_document(GraphDocument {
        entities: vec![
            entity("e-ps", "PlayStation", "brand"),
            entity("e-sony", "Sony India", "company"),
        ],
        chunks: vec![chunk],
        relationships: vec![
            Relationship {
                from: "e-ps".into(),
                to: "e-sony".into(),
                rel_type: "OWNED_BY".into(),
                properties: Map::new(),
            },
            mentions("c-ps", "e-ps"),
        ],
    });

    let index = VectorIndex::from_entries(vec![
        (
            HashScheme::NODE.derive("PlayStation"),
            vec_with_similarity(0.95),
        ),
        ("hash-c-ps".into(), vec_with_similarity(0.80)),
        (
            HashScheme::NODE.derive("Sony India"),
            vec_with_similarity(0.40),
        ),
    ])
    .unwrap();

    (graph, index)
}

fn params(top_k: usize) -> QueryParams {
    QueryParams {
        top_k,
        min_similarity: 0.0,
        ..QueryParams::new("how is PlayStation doing in India?")
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn end_to_end_ranks_entity_then_chunk() {
    let (graph, index) = toy_world();
    let embedder = FixedEmbedder(vec![1.0, 0.0]);
    let generator = CountingGenerator::default();
    let engine = RetrievalEngine::new(&graph, &index, &embedder, &generator);

    let response = engine.query(&params(2)).unwrap();

    assert_eq!(response.sources.len(), 2);
    match &response.sources[0] {
        SourceRecord::Entity { entity_id, label, .. } => {
            assert_eq!(entity_id, "e-ps");
            assert_eq!(label, "PlayStation");
        }
        other => panic!("expected entity first, got {other:?}"),
    }
    match &response.sources[1] {
        SourceRecord::Chunk {
            chunk_id,
            source_file,
            chunk_index,
            mentioned_entities,
            ..
        } => {
            assert_eq!(chunk_id, "c-ps");
            assert_eq!(source_file, "console_report.md");
            assert_eq!(*chunk_index, 4);
            assert_eq!(
                mentioned_entities.as_deref(),
                Some(&["PlayStation".to_string()][..])
            );
        }
        other => panic!("expected chunk second, got {other:?}"),
    }

    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    assert!(response.answer.starts_with("answer grounded in"));
    assert!(response.debug.is_none());
}

#[test]
fn chunk_weight_can_promote_chunks_over_entities() {
    let (graph, index) = toy_world();
    let embedder = FixedEmbedder(vec![1.0, 0.0]);
    let generator = CountingGenerator::default();
    let engine = RetrievalEngine::new(&graph, &index, &embedder, &generator);

    // 0.80 × 2.0 = 1.6 beats 0.95 × 1.0.
    let mut p = params(1);
    p.chunk_weight = 2.0;
    let response = engine.query(&p).unwrap();

    assert_eq!(response.sources.len(), 1);
    assert!(matches!(response.sources[0], SourceRecord::Chunk { .. }));
}

#[test]
fn weight_monotonicity_on_chunk_count() {
    let (graph, index) = toy_world();
    let embedder = FixedEmbedder(vec![1.0, 0.0]);
    let generator = CountingGenerator::default();
    let engine = RetrievalEngine::new(&graph, &index, &embedder, &generator);

    let chunk_count = |weight: f32| {
        let mut p = params(2);
        p.chunk_weight = weight;
        engine
            .query(&p)
            .unwrap()
            .sources
            .iter()
            .filter(|s| matches!(s, SourceRecord::Chunk { .. }))
            .count()
    };

    assert!(chunk_count(2.0) >= chunk_count(0.5));
}

#[test]
fn empty_result_short_circuits_generation() {
    let (graph, index) = toy_world();
    let embedder = FixedEmbedder(vec![1.0, 0.0]);
    let generator = CountingGenerator::default();
    let engine = RetrievalEngine::new(&graph, &index, &embedder, &generator);

    // Corpus max similarity is 0.95 < 0.99.
    let mut p = params(5);
    p.min_similarity = 0.99;
    p.debug = true;
    let response = engine.query(&p).unwrap();

    assert_eq!(response.answer, NO_RESULTS_ANSWER);
    assert!(response.sources.is_empty());
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);

    let debug = response.debug.unwrap();
    assert_eq!(debug.entity_count, 0);
    assert_eq!(debug.chunk_count, 0);
    assert_eq!(debug.top_results_breakdown.entities, 0);
    assert_eq!(debug.top_results_breakdown.chunks, 0);
}

#[test]
fn unresolvable_hashes_are_dropped_silently() {
    let (graph, _) = toy_world();
    // Index with one extra vector no graph node knows about.
    let index = VectorIndex::from_entries(vec![
        ("orphan-hash".into(), vec_with_similarity(0.99)),
        (
            HashScheme::NODE.derive("PlayStation"),
            vec_with_similarity(0.95),
        ),
    ])
    .unwrap();
    let embedder = FixedEmbedder(vec![1.0, 0.0]);
    let generator = CountingGenerator::default();
    let engine = RetrievalEngine::new(&graph, &index, &embedder, &generator);

    let response = engine.query(&params(2)).unwrap();
    assert_eq!(response.sources.len(), 1);
    assert!(matches!(
        response.sources[0],
        SourceRecord::Entity { .. }
    ));
}

#[test]
fn debug_payload_reflects_pools_and_rounding() {
    let (graph, index) = toy_world();
    let embedder = FixedEmbedder(vec![1.0, 0.0]);
    let generator = CountingGenerator::default();
    let engine = RetrievalEngine::new(&graph, &index, &embedder, &generator);

    let mut p = params(2);
    p.debug = true;
    let response = engine.query(&p).unwrap();

    let debug = response.debug.unwrap();
    assert_eq!(debug.entity_count, 2); // PlayStation + Sony India resolved
    assert_eq!(debug.chunk_count, 1);
    assert_eq!(debug.top_results_breakdown.entities, 1);
    assert_eq!(debug.top_results_breakdown.chunks, 1);
    assert_eq!(debug.similarities.len(), 2);

    assert_eq!(debug.similarities[0].kind, NodeKind::Entity);
    assert_eq!(debug.similarities[0].label, "PlayStation");
    assert!((debug.similarities[0].similarity - 0.95).abs() < 1e-3);

    assert_eq!(debug.similarities[1].kind, NodeKind::Chunk);
    assert_eq!(debug.similarities[1].label, "Chunk 4");

    assert!(debug.context_length > 0);
}

#[test]
fn generation_failure_degrades_into_answer() {
    let (graph, index) = toy_world();
    let embedder = FixedEmbedder(vec![1.0, 0.0]);
    let generator = CountingGenerator {
        calls: AtomicUsize::new(0),
        fail: true,
    };
    let engine = RetrievalEngine::new(&graph, &index, &embedder, &generator);

    let response = engine.query(&params(2)).unwrap();

    // Degraded but non-fatal: sources still present.
    assert_eq!(response.sources.len(), 2);
    assert!(response
        .answer
        .starts_with("I encountered an error generating a response"));
    assert!(response.answer.contains("upstream unavailable"));
}

#[test]
fn invalid_params_are_rejected_before_embedding() {
    let (graph, index) = toy_world();
    let embedder = FixedEmbedder(vec![1.0, 0.0]);
    let generator = CountingGenerator::default();
    let engine = RetrievalEngine::new(&graph, &index, &embedder, &generator);

    let mut p = params(2);
    p.top_k = 0;
    assert!(matches!(
        engine.query(&p),
        Err(LatticeError::InvalidParams { .. })
    ));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}
