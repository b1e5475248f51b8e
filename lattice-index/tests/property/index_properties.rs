//! Property tests: normalization, ordering, and threshold behavior hold for
//! arbitrary corpora, not just hand-picked fixtures.

use proptest::prelude::*;

use lattice_index::VectorIndex;

const DIM: usize = 4;

fn usable_vector() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1.0f32..1.0, DIM)
        .prop_filter("needs usable norm", |v| {
            v.iter().map(|x| x * x).sum::<f32>().sqrt() > 1e-3
        })
}

fn corpus(max: usize) -> impl Strategy<Value = Vec<(String, Vec<f32>)>> {
    prop::collection::vec(usable_vector(), 1..max).prop_map(|vectors| {
        vectors
            .into_iter()
            .enumerate()
            .map(|(i, v)| (format!("hash-{i}"), v))
            .collect()
    })
}

proptest! {
    #[test]
    fn every_stored_vector_is_unit_norm(entries in corpus(24)) {
        let hashes: Vec<String> = entries.iter().map(|(h, _)| h.clone()).collect();
        let index = VectorIndex::from_entries(entries).unwrap();
        for hash in &hashes {
            let v = index.get_normalized(hash).unwrap();
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            prop_assert!((norm - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn search_is_sorted_and_bounded(
        entries in corpus(24),
        query in usable_vector(),
        top_k in 1usize..32,
    ) {
        let corpus_len = entries.len();
        let index = VectorIndex::from_entries(entries).unwrap();
        let results = index.search(&query, top_k, 0.0).unwrap();

        prop_assert!(results.len() <= top_k.min(corpus_len));
        for pair in results.windows(2) {
            prop_assert!(pair[0].1 >= pair[1].1);
        }
        for (_, score) in &results {
            prop_assert!(*score >= -1.0 - 1e-4 && *score <= 1.0 + 1e-4);
        }
    }

    #[test]
    fn threshold_never_leaks_low_scores(
        entries in corpus(24),
        query in usable_vector(),
        threshold in 0.01f32..1.0,
    ) {
        let index = VectorIndex::from_entries(entries).unwrap();
        for (_, score) in index.search(&query, 32, threshold).unwrap() {
            prop_assert!(score >= threshold);
        }
    }
}
