//! Parallel chunking of independent documents.

use rayon::prelude::*;
use tracing::info;

use ragcut_core::{ChunkError, ChunkReport, ChunkingConfig, Document};

use crate::chunker::Chunker;

/// Chunking result for one document of a batch.
#[derive(Debug)]
pub struct DocumentChunks {
    pub name: String,
    pub result: Result<ChunkReport, ChunkError>,
}

/// Chunk every document in parallel. Output order matches `documents`;
/// a failure for one document does not affect the others.
pub fn chunk_documents(
    chunker: &Chunker,
    documents: &[Document],
    config: &ChunkingConfig,
) -> Vec<DocumentChunks> {
    let start = std::time::Instant::now();

    let results: Vec<DocumentChunks> = documents
        .par_iter()
        .map(|doc| DocumentChunks {
            name: doc.name.clone(),
            result: chunker.chunk(&doc.text, config),
        })
        .collect();

    let total_chunks: usize = results
        .iter()
        .filter_map(|r| r.result.as_ref().ok())
        .map(|report| report.chunks.len())
        .sum();
    info!(
        "Chunked {} documents into {} chunks in {:.1?} ({} threads)",
        documents.len(),
        total_chunks,
        start.elapsed(),
        rayon::current_num_threads()
    );

    results
}
