use std::path::PathBuf;

use ragcut_core::{ChunkingConfig, Config, EstimatorKind, ExportFormat};

use crate::cli::ChunkingArgs;

/// Settings for one run: environment config with CLI flags applied on top.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub chunking: ChunkingConfig,
    pub estimator: EstimatorKind,
    pub format: ExportFormat,
    pub output_dir: Option<PathBuf>,
}

impl RunSettings {
    /// Resolve settings. Priority: CLI flag > env var (profiled) > default.
    pub fn resolve(config: &Config, args: &ChunkingArgs) -> Self {
        let base = config.chunking;
        Self {
            chunking: ChunkingConfig {
                chunk_size: args.chunk_size.unwrap_or(base.chunk_size),
                chunk_size_unit: args.size_unit.unwrap_or(base.chunk_size_unit),
                overlap: args.overlap.unwrap_or(base.overlap),
                overlap_unit: args.overlap_unit.unwrap_or(base.overlap_unit),
            },
            estimator: args.estimator.unwrap_or(config.estimator),
            format: args.format.unwrap_or(config.output.format),
            output_dir: args
                .output_dir
                .clone()
                .or_else(|| config.output.dir.clone()),
        }
    }

    /// Apply the resolved values back onto `config`, for display.
    pub fn apply(&self, config: &Config) -> Config {
        let mut merged = config.clone();
        merged.chunking = self.chunking;
        merged.estimator = self.estimator;
        merged.output.format = self.format;
        merged.output.dir = self.output_dir.clone();
        merged
    }
}
