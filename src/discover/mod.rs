// src/discover/mod.rs
// =============================================================================
// Link discovery across a corpus of documents.
//
// Input is a list of raw document texts (the directory walk happens in
// main.rs); output is the set of unique external URLs referenced anywhere.
// =============================================================================

mod markdown;

pub use markdown::{extract_links, is_external};

use std::collections::BTreeSet;

// Collects every external link across all documents.
//
// Deduplication is exact string equality. A BTreeSet keeps the iteration
// order stable between runs, which makes batch composition reproducible;
// nothing downstream depends on that order for correctness.
pub fn discover<I, S>(documents: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    documents
        .into_iter()
        .flat_map(|doc| extract_links(doc.as_ref()))
        .collect()
}
