//! Traits for the two external collaborators: embedding and text generation.
//!
//! Both are opaque blocking calls. No retry or timeout policy lives here;
//! callers impose their own at the transport boundary.

use crate::errors::LatticeResult;

/// Embedding generation provider.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text, returning a fixed-length vector.
    fn embed(&self, text: &str) -> LatticeResult<Vec<f32>>;

    /// The dimensionality of vectors produced by this provider.
    fn dimensions(&self) -> usize;
}

/// Grounded text generation from a query and an assembled context.
pub trait ResponseGenerator: Send + Sync {
    /// Generate prose answering `query` using only `context`.
    fn generate(&self, query: &str, context: &str) -> LatticeResult<String>;
}
