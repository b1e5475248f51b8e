//! Lexical entity scoring against the raw query string.
//!
//! Every entity gets a single scalar in (0, 1] plus a match-type tag; the
//! first matching rule wins. Matches are keyed by the FULL SHA-256 of the
//! entity label — not the truncated scheme used for node hashes. The
//! asymmetry is part of the observed corpus contract: merging with vector
//! results only works when the corpus is keyed the same way, which is
//! verified by a property test rather than "fixed" here.

use std::collections::HashSet;
use std::fmt;

use lattice_core::hash::HashScheme;
use lattice_core::node::Entity;
use lattice_graph::GraphStore;

use crate::text::sequence_ratio;

/// Minimum alignment ratio for a fuzzy label/alias match.
const FUZZY_THRESHOLD: f32 = 0.75;

/// How a candidate earned its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    ExactLabel,
    LabelSubstring,
    ExactAlias,
    AliasSubstring,
    FuzzyMatch,
    Description,
    WordOverlap,
    /// Contributed by the vector index rather than keyword rules.
    Vector,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::ExactLabel => "exact_label",
            MatchType::LabelSubstring => "label_substring",
            MatchType::ExactAlias => "exact_alias",
            MatchType::AliasSubstring => "alias_substring",
            MatchType::FuzzyMatch => "fuzzy_match",
            MatchType::Description => "description",
            MatchType::WordOverlap => "word_overlap",
            MatchType::Vector => "vector",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A keyword-scored entity, keyed by the full-digest hash of its label.
#[derive(Debug, Clone)]
pub struct KeywordMatch {
    pub hash: String,
    pub score: f32,
    pub match_type: MatchType,
}

/// Score every entity in the graph against `query`. Entities matching no
/// rule are not emitted.
pub fn match_entities(graph: &GraphStore, query: &str) -> Vec<KeywordMatch> {
    let query_lower = query.to_lowercase().trim().to_string();
    let query_words: HashSet<&str> = query_lower.split_whitespace().collect();

    graph
        .entities()
        .iter()
        .filter_map(|entity| {
            score_entity(entity, &query_lower, &query_words).map(|(score, match_type)| {
                KeywordMatch {
                    hash: HashScheme::Full.derive(&entity.label),
                    score,
                    match_type,
                }
            })
        })
        .collect()
}

fn score_entity(
    entity: &Entity,
    query_lower: &str,
    query_words: &HashSet<&str>,
) -> Option<(f32, MatchType)> {
    let label = entity.label.to_lowercase();
    let aliases: Vec<String> = entity.aliases.iter().map(|a| a.to_lowercase()).collect();

    // Exact and substring rules, label before aliases.
    if query_lower == label {
        return Some((1.0, MatchType::ExactLabel));
    }
    if label.contains(query_lower) || query_lower.contains(label.as_str()) {
        return Some((0.9, MatchType::LabelSubstring));
    }
    if aliases.iter().any(|a| a.as_str() == query_lower) {
        return Some((0.95, MatchType::ExactAlias));
    }
    if aliases
        .iter()
        .any(|a| a.contains(query_lower) || query_lower.contains(a.as_str()))
    {
        return Some((0.85, MatchType::AliasSubstring));
    }

    // Fuzzy alignment over label and aliases, first hit wins.
    for candidate in std::iter::once(label.as_str()).chain(aliases.iter().map(String::as_str)) {
        let ratio = sequence_ratio(query_lower, candidate);
        if ratio >= FUZZY_THRESHOLD {
            return Some((0.88 * ratio, MatchType::FuzzyMatch));
        }
    }

    if entity.description.to_lowercase().contains(query_lower) {
        return Some((0.6, MatchType::Description));
    }

    // Whitespace-tokenized word overlap between query and label.
    let label_words: HashSet<&str> = label.split_whitespace().collect();
    let overlap = label_words.intersection(query_words).count();
    if overlap > 0 {
        return Some((0.3 + 0.1 * overlap as f32, MatchType::WordOverlap));
    }

    None
}
