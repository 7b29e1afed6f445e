//! Token estimation strategies.
//!
//! None of these are real tokenizers. They give a rough, deterministic size
//! figure that is good enough to budget embedding requests.

use ragcut_core::{EstimatorKind, CHARS_PER_TOKEN};

/// Estimates how many language-model tokens a piece of text will use.
pub trait TokenEstimator: Send + Sync {
    /// Short identifier recorded in exports.
    fn name(&self) -> &str;

    fn estimate(&self, text: &str) -> usize;
}

/// `ceil(characters / 4)`. Coarse approximation, not a tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharHeuristicEstimator;

impl TokenEstimator for CharHeuristicEstimator {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn estimate(&self, text: &str) -> usize {
        text.chars().count().div_ceil(CHARS_PER_TOKEN)
    }
}

/// Counts whitespace-separated words.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceEstimator;

impl TokenEstimator for WhitespaceEstimator {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn estimate(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

/// Estimate tokens with the default `ceil(chars / 4)` heuristic.
pub fn estimate_tokens(text: &str) -> usize {
    CharHeuristicEstimator.estimate(text)
}

pub fn estimator_for(kind: EstimatorKind) -> Box<dyn TokenEstimator> {
    match kind {
        EstimatorKind::Heuristic => Box::new(CharHeuristicEstimator),
        EstimatorKind::Whitespace => Box::new(WhitespaceEstimator),
    }
}
