//! # lattice-index
//!
//! In-memory vector index over the precomputed embedding corpus.
//! Corpus vectors are L2-normalized once at load time so that cosine
//! similarity reduces to a dot product per query.

mod index;

pub use index::VectorIndex;
