//! JSON, Markdown and plain-text renderings of a chunk sequence.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use ragcut_core::{Chunk, ChunkError, ChunkReport, ChunkingConfig, ExportFormat};

use crate::estimator::TokenEstimator;

/// A chunking result plus the settings that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkExport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub config: ChunkingConfig,
    pub estimator: String,
    pub total_chunks: usize,
    pub total_characters: usize,
    pub total_estimated_tokens: usize,
    #[serde(default)]
    pub warnings: Vec<String>,
    pub chunks: Vec<Chunk>,
}

impl ChunkExport {
    pub fn new(
        source: Option<String>,
        config: ChunkingConfig,
        estimator: &dyn TokenEstimator,
        report: ChunkReport,
    ) -> Self {
        Self {
            source,
            config,
            estimator: estimator.name().to_string(),
            total_chunks: report.chunks.len(),
            total_characters: report.total_characters(),
            total_estimated_tokens: report.total_estimated_tokens(),
            warnings: report.warnings.iter().map(ToString::to_string).collect(),
            chunks: report.chunks,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ChunkError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse either a single export object or an array of them, as written
    /// by a multi-document run.
    pub fn from_json_many(json: &str) -> Result<Vec<Self>, ChunkError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Many(Vec<ChunkExport>),
            One(Box<ChunkExport>),
        }

        Ok(match serde_json::from_str(json)? {
            OneOrMany::Many(exports) => exports,
            OneOrMany::One(export) => vec![*export],
        })
    }

    pub fn to_json(&self) -> Result<String, ChunkError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let title = self.source.as_deref().unwrap_or("document");
        let _ = writeln!(out, "# Chunks: {title}\n");
        let _ = writeln!(out, "- Chunks: {}", self.total_chunks);
        let _ = writeln!(
            out,
            "- Chunk size: {} {}",
            self.config.chunk_size, self.config.chunk_size_unit
        );
        let _ = writeln!(
            out,
            "- Overlap: {} {}",
            self.config.overlap, self.config.overlap_unit
        );
        let _ = writeln!(out, "- Total characters: {}", self.total_characters);
        let _ = writeln!(
            out,
            "- Estimated tokens: {} ({})",
            self.total_estimated_tokens, self.estimator
        );
        for warning in &self.warnings {
            let _ = writeln!(out, "\n> Warning: {warning}");
        }

        for chunk in &self.chunks {
            let fence = "`".repeat(longest_backtick_run(&chunk.text).max(2) + 1);
            let _ = writeln!(out, "\n## Chunk {} of {}\n", chunk.index + 1, self.total_chunks);
            let _ = writeln!(
                out,
                "Characters: {} · Estimated tokens: {} · Offset: {}\n",
                chunk.character_count, chunk.estimated_tokens, chunk.char_offset
            );
            let _ = writeln!(out, "{fence}text\n{}\n{fence}", chunk.text);
        }
        out
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for chunk in &self.chunks {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = writeln!(
                out,
                "=== Chunk {}/{} ({} characters, ~{} tokens) ===",
                chunk.index + 1,
                self.total_chunks,
                chunk.character_count,
                chunk.estimated_tokens
            );
            let _ = writeln!(out, "{}", chunk.text);
        }
        out
    }
}

/// Pretty JSON array holding every export, in order.
pub fn exports_to_json(exports: &[ChunkExport]) -> Result<String, ChunkError> {
    Ok(serde_json::to_string_pretty(exports)?)
}

/// Render `export` in the requested format.
pub fn render(export: &ChunkExport, format: ExportFormat) -> Result<String, ChunkError> {
    match format {
        ExportFormat::Json => export.to_json(),
        ExportFormat::Markdown => Ok(export.to_markdown()),
        ExportFormat::Text => Ok(export.to_text()),
    }
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}
