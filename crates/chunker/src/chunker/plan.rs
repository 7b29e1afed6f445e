//! Configuration normalization.

use ragcut_core::{ChunkError, ChunkWarning, ChunkingConfig, SizeUnit};

/// A validated chunking configuration, expressed in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Nominal chunk length before any token top-up.
    pub span_chars: usize,
    /// Characters shared between consecutive chunks, always `< span_chars`.
    pub overlap_chars: usize,
    /// Cursor advance per chunk, always `>= 1`.
    pub step_chars: usize,
    /// Minimum estimated tokens per chunk in token mode.
    pub target_tokens: Option<usize>,
    pub warnings: Vec<ChunkWarning>,
}

impl ChunkPlan {
    /// Validate `config`. A zero chunk size is rejected; an overlap that would
    /// stall the cursor is clamped to `span - 1` with a warning.
    pub fn new(config: &ChunkingConfig) -> Result<Self, ChunkError> {
        if config.chunk_size == 0 {
            return Err(ChunkError::InvalidChunkSize(config.chunk_size));
        }

        let span_chars = config.chunk_size_unit.to_chars(config.chunk_size);
        let requested = config.overlap_unit.to_chars(config.overlap);

        let mut warnings = Vec::new();
        let overlap_chars = if requested >= span_chars {
            let clamped = span_chars - 1;
            tracing::warn!(
                requested_chars = requested,
                clamped_chars = clamped,
                "overlap is not smaller than chunk size, clamping"
            );
            warnings.push(ChunkWarning::OverlapClamped {
                requested_chars: requested,
                clamped_chars: clamped,
            });
            clamped
        } else {
            requested
        };

        let target_tokens = match config.chunk_size_unit {
            SizeUnit::Tokens => Some(config.chunk_size),
            SizeUnit::Characters => None,
        };

        Ok(Self {
            span_chars,
            overlap_chars,
            step_chars: span_chars - overlap_chars,
            target_tokens,
            warnings,
        })
    }
}
