//! Rebuild the source text from a chunk sequence.

use ragcut_core::{Chunk, ChunkError};

/// Concatenate `chunks`, dropping the overlapping prefix of each one.
///
/// Chunks must be in index order starting at 0, their `character_count` must
/// match their text, and they must not leave a gap between the end of one
/// chunk and the start of the next.
pub fn reassemble(chunks: &[Chunk]) -> Result<String, ChunkError> {
    let mut out = String::with_capacity(chunks.iter().map(|c| c.text.len()).sum());
    let mut covered = 0usize;

    for (position, chunk) in chunks.iter().enumerate() {
        if chunk.index != position {
            return Err(ChunkError::OutOfOrder {
                position,
                found: chunk.index,
            });
        }
        if chunk.char_offset > covered {
            return Err(ChunkError::Gap {
                index: chunk.index,
                offset: chunk.char_offset,
                covered,
            });
        }

        let actual = chunk.text.chars().count();
        if chunk.character_count != actual {
            return Err(ChunkError::CountMismatch {
                index: chunk.index,
                declared: chunk.character_count,
                actual,
            });
        }
        let end = chunk
            .end_offset()
            .ok_or(ChunkError::OffsetOverflow { index: chunk.index })?;

        let skip = covered - chunk.char_offset;
        out.extend(chunk.text.chars().skip(skip));
        covered = covered.max(end);
    }

    Ok(out)
}
