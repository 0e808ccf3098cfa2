//! Fuzzy show-name resolution with confidence scoring

use crate::traits::{ShowMatch, ShowResolver};
use strsim::normalized_levenshtein;

/// Default minimum similarity for a fuzzy match
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.65;

/// Local resolver based on normalized Levenshtein similarity
///
/// An exact case-insensitive match always wins with confidence 1.0.
/// Otherwise the most similar candidate at or above the threshold is chosen.
#[derive(Debug, Clone)]
pub struct FuzzyResolver {
    threshold: f64,
}

impl Default for FuzzyResolver {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl FuzzyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom threshold, clamped to `[0, 1]`
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl ShowResolver for FuzzyResolver {
    fn resolve_show(&self, query: &str, candidates: &[String]) -> Option<ShowMatch> {
        let normalized_query = normalize_string(query);
        if normalized_query.is_empty() {
            return None;
        }

        if let Some(exact) = candidates
            .iter()
            .find(|candidate| normalize_string(candidate) == normalized_query)
        {
            return Some(ShowMatch {
                name: exact.clone(),
                confidence: 1.0,
            });
        }

        let mut best: Option<(&String, f64)> = None;
        for candidate in candidates {
            let similarity = normalized_levenshtein(&normalized_query, &normalize_string(candidate));
            if similarity < self.threshold {
                continue;
            }
            match best {
                Some((_, best_similarity)) if similarity <= best_similarity => {}
                _ => best = Some((candidate, similarity)),
            }
        }

        best.map(|(name, confidence)| ShowMatch {
            name: name.clone(),
            confidence,
        })
    }
}

/// Normalize a string for comparison (lowercase, trim, collapse whitespace)
fn normalize_string(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
