//! # lattice-core
//!
//! Foundation crate for the lattice retrieval engine.
//! Defines node types, errors, the embedding hash scheme, query parameters,
//! the response model, and the traits for external collaborators.
//! Every other crate in the workspace depends on this.

pub mod errors;
pub mod hash;
pub mod node;
pub mod params;
pub mod response;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use errors::{LatticeError, LatticeResult};
pub use hash::HashScheme;
pub use node::{DocumentChunk, Entity, NodeKind, NodeRef, Relationship};
pub use params::QueryParams;
pub use response::{DebugInfo, QueryResponse, SourceRecord};
pub use traits::{EmbeddingProvider, ResponseGenerator};
