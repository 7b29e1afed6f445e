use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Chunk size must be a positive integer (got {0})")]
    InvalidChunkSize(usize),

    #[error("Unknown size unit: '{0}' (expected 'characters' or 'tokens')")]
    InvalidUnit(String),

    #[error("Unknown export format: '{0}' (expected 'json', 'markdown' or 'text')")]
    InvalidFormat(String),

    #[error("Unknown token estimator: '{0}' (expected 'heuristic' or 'whitespace')")]
    InvalidEstimator(String),

    #[error("Chunk at position {position} has index {found}")]
    OutOfOrder { position: usize, found: usize },

    #[error("Chunk {index} declares {declared} characters but its text has {actual}")]
    CountMismatch {
        index: usize,
        declared: usize,
        actual: usize,
    },

    #[error("Chunk {index} ends past the largest representable offset")]
    OffsetOverflow { index: usize },

    #[error("Chunk {index} starts at offset {offset} but only {covered} characters are covered")]
    Gap {
        index: usize,
        offset: usize,
        covered: usize,
    },
}

impl From<serde_json::Error> for ChunkError {
    fn from(e: serde_json::Error) -> Self {
        ChunkError::Serialize(e.to_string())
    }
}
