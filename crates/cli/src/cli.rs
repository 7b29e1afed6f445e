use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ragcut_core::{EstimatorKind, ExportFormat, SizeUnit};

/// Split text into overlapping chunks for retrieval-augmented generation.
///
/// Settings come from flags, then `{PROFILE}_KEY` / `KEY` environment
/// variables (a `.env` file is loaded if present), then built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "ragcut", version, about)]
pub struct CliArgs {
    /// Config profile (overrides RAGCUT_PROFILE)
    #[arg(long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chunk files (or stdin when none are given) and write an export per document
    Chunk(ChunkArgs),
    /// Print character counts and estimated tokens
    Estimate(EstimateArgs),
    /// Rebuild the original text from a JSON export
    Reassemble {
        /// Path to a JSON export produced by `ragcut chunk`
        path: PathBuf,
        /// Document to rebuild when the export holds several (0-based)
        #[arg(long)]
        document: Option<usize>,
    },
    /// Print the resolved configuration as JSON
    Config(ChunkingArgs),
}

/// Flags that override the chunking settings from the environment.
#[derive(Args, Debug, Default, Clone)]
pub struct ChunkingArgs {
    /// Target chunk size (CHUNK_SIZE)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Unit of --chunk-size: characters or tokens (CHUNK_SIZE_UNIT)
    #[arg(long)]
    pub size_unit: Option<SizeUnit>,

    /// Overlap between consecutive chunks (CHUNK_OVERLAP)
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Unit of --overlap: characters or tokens (CHUNK_OVERLAP_UNIT)
    #[arg(long)]
    pub overlap_unit: Option<SizeUnit>,

    /// Token estimator: heuristic or whitespace (TOKEN_ESTIMATOR)
    #[arg(long)]
    pub estimator: Option<EstimatorKind>,

    /// Export format: json, markdown or text (OUTPUT_FORMAT)
    #[arg(long)]
    pub format: Option<ExportFormat>,

    /// Write one export file per document here instead of stdout (OUTPUT_DIR)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ChunkArgs {
    /// Input files; reads stdin when empty
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub chunking: ChunkingArgs,
}

#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Input files; reads stdin when empty
    pub files: Vec<PathBuf>,

    /// Token estimator: heuristic or whitespace (TOKEN_ESTIMATOR)
    #[arg(long)]
    pub estimator: Option<EstimatorKind>,
}
