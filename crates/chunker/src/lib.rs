//! Deterministic text chunking for retrieval-augmented generation.
//!
//! Splits a document into overlapping, bounded-size chunks, annotates each
//! with its position and a token estimate, and renders the result as JSON,
//! Markdown or plain text.

pub mod batch;
pub mod chunker;
pub mod estimator;
pub mod export;
pub mod reassemble;

pub use batch::{chunk_documents, DocumentChunks};
pub use chunker::{chunk_text, ChunkPlan, Chunker};
pub use estimator::{
    estimate_tokens, estimator_for, CharHeuristicEstimator, TokenEstimator, WhitespaceEstimator,
};
pub use export::{exports_to_json, render, ChunkExport};
pub use reassemble::reassemble;
