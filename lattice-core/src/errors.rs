/// Errors for the lattice retrieval engine.
///
/// Load-time problems (malformed documents, dimension mismatches) are fatal:
/// construction returns `Err` and no partial state is served. Resolution
/// misses (a hash with no matching node) are `Option::None` at the call
/// sites, never errors. Generation failures are caught by the retriever and
/// degraded into the answer text.
#[derive(Debug, thiserror::Error)]
pub enum LatticeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("vector dimension mismatch for '{hash}': expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        hash: String,
    },

    #[error("invalid vector for '{hash}': {reason}")]
    InvalidVector { hash: String, reason: String },

    #[error("invalid query parameters: {reason}")]
    InvalidParams { reason: String },

    #[error("embedding failed: {reason}")]
    Embedding { reason: String },

    #[error("generation failed: {reason}")]
    Generation { reason: String },
}

pub type LatticeResult<T> = Result<T, LatticeError>;
