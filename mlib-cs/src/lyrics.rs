//! Couplet (stanza) pagination of lyric text

use crate::error::{CatalogError, CatalogResult};

/// Blank line between two stanzas
const STANZA_BOUNDARY: &str = "\n\n";

/// Return stanza `index` of `lyrics`, counting from 1
///
/// Index 0 reads as 1. Text without a blank line is a single stanza. A
/// returned stanza never includes the newlines of the boundary that ends it.
pub fn couplet(lyrics: &str, index: usize) -> CatalogResult<&str> {
    let index = index.max(1);

    let mut available = 0;
    for (n, stanza) in lyrics.split(STANZA_BOUNDARY).enumerate() {
        if n + 1 == index {
            return Ok(stanza);
        }
        available = n + 1;
    }

    Err(CatalogError::OutOfRange {
        requested: index,
        available,
    })
}

/// Number of stanzas in `lyrics`
pub fn couplet_count(lyrics: &str) -> usize {
    lyrics.split(STANZA_BOUNDARY).count()
}
