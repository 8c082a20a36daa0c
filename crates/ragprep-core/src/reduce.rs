//! Metadata reduction.

use crate::types::Document;

/// Reduce every document to its page content and `source` metadata.
///
/// Returns new documents in the same order; the input is not modified.
/// Documents without a `source` get `source: null`.
#[must_use]
pub fn filter_to_minimal_docs(docs: &[Document]) -> Vec<Document> {
    docs.iter().map(Document::to_minimal).collect()
}
