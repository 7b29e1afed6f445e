use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::document::Chunk;
use crate::error::ChunkError;

/// Approximate number of characters per language-model token.
///
/// Used for every token → character conversion. This is a coarse heuristic,
/// not a tokenizer.
pub const CHARS_PER_TOKEN: usize = 4;

// ── Units ─────────────────────────────────────────────────────

/// Unit in which a chunk size or overlap is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    #[default]
    Characters,
    Tokens,
}

impl SizeUnit {
    /// Convert an amount in this unit to characters.
    pub fn to_chars(self, amount: usize) -> usize {
        match self {
            SizeUnit::Characters => amount,
            SizeUnit::Tokens => amount.saturating_mul(CHARS_PER_TOKEN),
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeUnit::Characters => write!(f, "characters"),
            SizeUnit::Tokens => write!(f, "tokens"),
        }
    }
}

impl FromStr for SizeUnit {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "characters" | "chars" | "char" => Ok(SizeUnit::Characters),
            "tokens" | "token" => Ok(SizeUnit::Tokens),
            other => Err(ChunkError::InvalidUnit(other.to_string())),
        }
    }
}

// ── Configuration ─────────────────────────────────────────────

/// Chunk size and overlap, each with its own unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkingConfig {
    /// Target size of each chunk (default: 500).
    pub chunk_size: usize,
    pub chunk_size_unit: SizeUnit,
    /// Amount shared between consecutive chunks (default: 50).
    pub overlap: usize,
    pub overlap_unit: SizeUnit,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_size_unit: SizeUnit::Characters,
            overlap: 50,
            overlap_unit: SizeUnit::Characters,
        }
    }
}

impl ChunkingConfig {
    pub fn characters(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_size_unit: SizeUnit::Characters,
            overlap,
            overlap_unit: SizeUnit::Characters,
        }
    }

    pub fn tokens(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_size_unit: SizeUnit::Tokens,
            overlap,
            overlap_unit: SizeUnit::Tokens,
        }
    }
}

// ── Warnings & report ─────────────────────────────────────────

/// A configuration problem that was normalized instead of rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChunkWarning {
    /// Overlap was not smaller than the chunk span and has been reduced.
    #[serde(rename_all = "camelCase")]
    OverlapClamped {
        requested_chars: usize,
        clamped_chars: usize,
    },
}

impl fmt::Display for ChunkWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkWarning::OverlapClamped {
                requested_chars,
                clamped_chars,
            } => write!(
                f,
                "overlap of {} characters is not smaller than the chunk size; clamped to {}",
                requested_chars, clamped_chars
            ),
        }
    }
}

/// Output of one chunking run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkReport {
    pub chunks: Vec<Chunk>,
    pub warnings: Vec<ChunkWarning>,
}

impl ChunkReport {
    pub fn total_characters(&self) -> usize {
        self.chunks.iter().map(|c| c.character_count).sum()
    }

    pub fn total_estimated_tokens(&self) -> usize {
        self.chunks.iter().map(|c| c.estimated_tokens).sum()
    }
}

// ── Estimator selection ───────────────────────────────────────

/// Which token estimation strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimatorKind {
    /// `ceil(characters / 4)`.
    #[default]
    Heuristic,
    /// Whitespace-separated word count.
    Whitespace,
}

impl fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimatorKind::Heuristic => write!(f, "heuristic"),
            EstimatorKind::Whitespace => write!(f, "whitespace"),
        }
    }
}

impl FromStr for EstimatorKind {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heuristic" | "chars" => Ok(EstimatorKind::Heuristic),
            "whitespace" | "words" => Ok(EstimatorKind::Whitespace),
            other => Err(ChunkError::InvalidEstimator(other.to_string())),
        }
    }
}

// ── Export format ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Markdown,
    Text,
}

impl ExportFormat {
    /// File extension used when writing an export to disk.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Text => write!(f, "text"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "text" | "txt" | "plain" => Ok(ExportFormat::Text),
            other => Err(ChunkError::InvalidFormat(other.to_string())),
        }
    }
}
