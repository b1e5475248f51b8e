//! Property tests tying the hash namespaces together: keyword-matched
//! hashes must actually resolve against a corpus keyed by the full-label
//! scheme, and the dual-source rerank must stay sorted and bounded.

use proptest::prelude::*;
use serde_json::Map;

use lattice_core::errors::LatticeResult;
use lattice_core::hash::HashScheme;
use lattice_core::node::Entity;
use lattice_core::params::QueryParams;
use lattice_core::traits::{EmbeddingProvider, ResponseGenerator};
use lattice_graph::{GraphDocument, GraphStore};
use lattice_index::VectorIndex;
use lattice_retrieval::{keyword, RetrievalEngine};

struct FixedEmbedder(Vec<f32>);

impl EmbeddingProvider for FixedEmbedder {
    fn embed(&self, _text: &str) -> LatticeResult<Vec<f32>> {
        Ok(self.0.clone())
    }

    fn dimensions(&self) -> usize {
        self.0.len()
    }
}

struct EchoGenerator;

impl ResponseGenerator for EchoGenerator {
    fn generate(&self, _query: &str, _context: &str) -> LatticeResult<String> {
        Ok("ok".into())
    }
}

fn label_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,14}"
}

fn entities(labels: Vec<String>) -> Vec<Entity> {
    labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| Entity {
            id: format!("e-{i}"),
            entity_type: "concept".into(),
            label,
            description: String::new(),
            aliases: Vec::new(),
            properties: Map::new(),
            embedding_hash: None,
        })
        .collect()
}

proptest! {
    /// Every hash the keyword matcher emits resolves against a vector
    /// corpus keyed by the full-label scheme. Guards the deliberate
    /// full-vs-truncated hash asymmetry: if either side changed its
    /// derivation, the merge would silently stop joining.
    #[test]
    fn keyword_hashes_resolve_against_full_label_corpus(
        labels in prop::collection::vec(label_strategy(), 1..12),
        query in "[A-Za-z][A-Za-z0-9 ]{0,14}",
    ) {
        let graph = GraphStore::from_document(GraphDocument {
            entities: entities(labels.clone()),
            chunks: Vec::new(),
            relationships: Vec::new(),
        });
        let index = VectorIndex::from_entries(
            labels
                .iter()
                .map(|label| (HashScheme::Full.derive(label), vec![1.0f32, 0.5]))
                .collect(),
        ).unwrap();

        for hit in keyword::match_entities(&graph, &query) {
            prop_assert!(
                index.contains(&hit.hash),
                "keyword hash {} does not resolve",
                hit.hash
            );
            prop_assert!(hit.score > 0.0 && hit.score <= 1.0);
        }
    }

    /// The dual-source output is sorted descending and never exceeds top_k,
    /// for arbitrary weights and thresholds.
    #[test]
    fn rerank_is_sorted_and_bounded(
        labels in prop::collection::vec(label_strategy(), 1..12),
        top_k in 1usize..20,
        entity_weight in 0.1f32..2.0,
        chunk_weight in 0.1f32..2.0,
        min_similarity in 0.0f32..1.0,
    ) {
        let graph = GraphStore::from_document(GraphDocument {
            entities: entities(labels.clone()),
            chunks: Vec::new(),
            relationships: Vec::new(),
        });
        // Corpus keyed by the node scheme so hits resolve to entities.
        let index = VectorIndex::from_entries(
            labels
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    let s = 0.1 + 0.8 * (i as f32 / labels.len() as f32);
                    (
                        HashScheme::NODE.derive(label.trim()),
                        vec![s, (1.0 - s * s).sqrt()],
                    )
                })
                .collect(),
        ).unwrap();
        let embedder = FixedEmbedder(vec![1.0, 0.0]);
        let generator = EchoGenerator;
        let engine = RetrievalEngine::new(&graph, &index, &embedder, &generator);

        let params = QueryParams {
            top_k,
            entity_weight,
            chunk_weight,
            min_similarity,
            ..QueryParams::new("anything at all")
        };
        let response = engine.query(&params).unwrap();

        prop_assert!(response.sources.len() <= top_k);

        let mut p = params;
        p.debug = true;
        let debug = engine.query(&p).unwrap().debug.unwrap();
        for pair in debug.similarities.windows(2) {
            prop_assert!(pair[0].similarity >= pair[1].similarity);
        }
    }
}
