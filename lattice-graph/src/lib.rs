//! # lattice-graph
//!
//! Knowledge graph store: loads the entity and chunk collections plus the
//! relationship list from one JSON document, builds hash/ID lookup indexes,
//! and answers mention and traversal queries. Read-only after construction.

mod document;
mod store;

pub use document::{GraphDocument, GraphStats};
pub use store::{GraphStore, MENTIONS_TYPE};
