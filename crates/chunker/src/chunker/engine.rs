//! The chunking loop.

use ragcut_core::{Chunk, ChunkError, ChunkReport, ChunkingConfig, CHARS_PER_TOKEN};

use super::plan::ChunkPlan;
use crate::estimator::{CharHeuristicEstimator, TokenEstimator};

/// Splits text into overlapping chunks, sizing them with a [`TokenEstimator`].
pub struct Chunker {
    estimator: Box<dyn TokenEstimator>,
}

impl Chunker {
    pub fn new(estimator: Box<dyn TokenEstimator>) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &dyn TokenEstimator {
        self.estimator.as_ref()
    }

    /// Chunk `text` according to `config`.
    ///
    /// Empty text yields an empty report. The result depends only on the
    /// inputs; calling this twice with the same arguments gives equal reports.
    pub fn chunk(&self, text: &str, config: &ChunkingConfig) -> Result<ChunkReport, ChunkError> {
        let plan = ChunkPlan::new(config)?;
        let chunks = self.chunk_with_plan(text, &plan);
        tracing::debug!(
            bytes = text.len(),
            span = plan.span_chars,
            step = plan.step_chars,
            chunks = chunks.len(),
            "chunked text"
        );
        Ok(ChunkReport {
            chunks,
            warnings: plan.warnings,
        })
    }

    fn chunk_with_plan(&self, text: &str, plan: &ChunkPlan) -> Vec<Chunk> {
        let index = CharIndex::new(text);
        let total = index.len();
        if total == 0 {
            return Vec::new();
        }

        let mut chunks = Vec::with_capacity(total.div_ceil(plan.step_chars));
        let mut cursor: usize = 0;
        loop {
            let mut end = cursor.saturating_add(plan.span_chars).min(total);

            if let Some(target) = plan.target_tokens {
                end = self.top_up(&index, cursor, end, target);
            }

            let piece = index.slice(cursor, end);
            chunks.push(Chunk {
                index: chunks.len(),
                text: piece.to_string(),
                character_count: end - cursor,
                estimated_tokens: self.estimator.estimate(piece),
                char_offset: cursor,
            });

            if end >= total {
                break;
            }
            cursor += plan.step_chars;
        }
        chunks
    }

    /// Extend `end` until the slice reaches `target` estimated tokens or the
    /// end of the text. Each step adds `deficit * CHARS_PER_TOKEN` characters,
    /// so the chunk overshoots the target by at most one step.
    fn top_up(&self, index: &CharIndex<'_>, start: usize, mut end: usize, target: usize) -> usize {
        let total = index.len();
        while end < total {
            let estimated = self.estimator.estimate(index.slice(start, end));
            if estimated >= target {
                break;
            }
            let grow = (target - estimated).saturating_mul(CHARS_PER_TOKEN).max(1);
            end = end.saturating_add(grow).min(total);
        }
        end
    }
}

/// Char-position to byte-offset table, so slicing never splits a UTF-8 sequence.
struct CharIndex<'a> {
    text: &'a str,
    /// Byte offset of every char boundary, plus the end of the string.
    bounds: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    fn new(text: &'a str) -> Self {
        let bounds = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { text, bounds }
    }

    /// Length in characters.
    fn len(&self) -> usize {
        self.bounds.len() - 1
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[self.bounds[start]..self.bounds[end]]
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(Box::new(CharHeuristicEstimator))
    }
}

/// Chunk `text` with the default heuristic estimator, discarding warnings.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, ChunkError> {
    Chunker::default().chunk(text, config).map(|report| report.chunks)
}
