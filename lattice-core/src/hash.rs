//! Embedding hash derivation.
//!
//! Graph nodes are linked to their precomputed vectors by a content-derived
//! SHA-256 hex digest. The corpus uses two distinct key lengths: node hashes
//! derived at graph load time are truncated to [`NODE_HASH_LEN`] characters,
//! while the keyword matcher keys its results by the full digest. The two
//! schemes are intentionally separate configuration points; unifying them
//! would silently break hash joins against an existing corpus.

use sha2::{Digest, Sha256};

/// Hex length of node hashes derived at graph load time.
pub const NODE_HASH_LEN: usize = 16;

/// How to derive an embedding hash from node text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    /// Full 64-character SHA-256 hex digest.
    Full,
    /// SHA-256 hex digest truncated to the given number of characters.
    Truncated(usize),
}

impl HashScheme {
    /// The scheme used for entity hashes derived at graph load time.
    pub const NODE: HashScheme = HashScheme::Truncated(NODE_HASH_LEN);

    /// Derive the hash of `text` under this scheme.
    pub fn derive(self, text: &str) -> String {
        let digest = hex::encode(Sha256::digest(text.as_bytes()));
        match self {
            HashScheme::Full => digest,
            HashScheme::Truncated(len) => {
                let mut digest = digest;
                digest.truncate(len);
                digest
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_is_prefix_of_full() {
        let full = HashScheme::Full.derive("PlayStation");
        let short = HashScheme::NODE.derive("PlayStation");
        assert_eq!(full.len(), 64);
        assert_eq!(short.len(), NODE_HASH_LEN);
        assert!(full.starts_with(&short));
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(
            HashScheme::Full.derive("Sony India"),
            HashScheme::Full.derive("Sony India")
        );
        assert_ne!(
            HashScheme::Full.derive("Sony"),
            HashScheme::Full.derive("sony")
        );
    }
}
