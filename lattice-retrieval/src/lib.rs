//! # lattice-retrieval
//!
//! The retrieval pipelines over the graph store and vector index:
//!
//! - [`keyword`]: lexical entity scoring (exact/substring/fuzzy/overlap).
//! - [`hybrid`]: vector + keyword fusion, entity-only legacy mode.
//! - [`engine`]: the dual-source pipeline — one vector query split into
//!   weighted entity and chunk pools, merged, reranked, and turned into a
//!   grounded answer with typed citations.
//! - [`context`] / [`sources`]: context assembly and citation formatting.

pub mod context;
pub mod engine;
pub mod hybrid;
pub mod keyword;
pub mod sources;
mod text;

pub use engine::{RetrievalEngine, ScoredNode, NO_RESULTS_ANSWER};
pub use hybrid::{HybridRanker, RankedMatch};
pub use keyword::{KeywordMatch, MatchType};
