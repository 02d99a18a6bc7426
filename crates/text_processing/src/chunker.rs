//! Sentence packing under the per-utterance character limit
//!
//! Sentences are accumulated greedily, joined by one space. A chunk is
//! closed as soon as the next sentence would bring it to the limit, so
//! every chunk stays strictly below it. A sentence that alone reaches the
//! limit becomes its own chunk; it is truncated later, when the speech
//! payload is built.

use crate::sentence::SentenceUnit;

/// Pack sentences into chunks shorter than `limit` characters
pub fn pack_chunks<I>(units: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = SentenceUnit>,
{
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    // Character count of `chunk`, trailing join space included
    let mut chunk_len = 0;

    for unit in units {
        let unit_len = unit.len();

        if chunk_len + unit_len >= limit {
            let full = chunk.trim();
            if !full.is_empty() {
                chunks.push(full.to_string());
            }
            chunk.clear();
            chunk_len = 0;
        }

        chunk.push_str(&unit.text);
        chunk.push(' ');
        chunk_len += unit_len + 1;
    }

    let rest = chunk.trim();
    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }

    chunks
}
