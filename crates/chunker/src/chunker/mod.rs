//! Fixed-size chunking engine with overlap.
//!
//! Configuration is normalized into a [`ChunkPlan`] (character span, step and
//! optional token target), then a single cursor walks the text emitting one
//! chunk per step until a chunk reaches the end of the input.

mod engine;
mod plan;

pub use engine::{chunk_text, Chunker};
pub use plan::ChunkPlan;
