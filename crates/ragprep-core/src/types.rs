//! Core types for ragprep.
//!
//! ## Documents
//! - [`Document`]: Extracted text paired with its metadata
//! - [`Metadata`]: String-keyed map of JSON values
//!
//! ## Embeddings
//! - [`EmbeddingConfig`]: Configuration for embedding generation
//! - [`EmbeddingOutput`]: Result of embedding a text

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Metadata attached to a document.
///
/// Values are JSON so that page numbers stay integers and a missing source
/// can be recorded as `null`.
pub type Metadata = HashMap<String, Value>;

/// Well-known metadata keys.
pub mod keys {
    /// Path of the file a document was loaded from.
    pub const SOURCE: &str = "source";
    /// 0-based page index within the source PDF.
    pub const PAGE: &str = "page";
    /// Number of pages in the source PDF.
    pub const TOTAL_PAGES: &str = "total_pages";
    /// Character offset of a chunk within its parent document.
    pub const START_INDEX: &str = "start_index";
}

// ============================================================================
// Documents
// ============================================================================

/// A unit of extracted text paired with source metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The text content
    pub page_content: String,
    /// Metadata such as `source` and `page`
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Create a document with empty metadata.
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: Metadata::new(),
        }
    }

    /// Create a document with the given metadata.
    pub fn with_metadata(page_content: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            page_content: page_content.into(),
            metadata,
        }
    }

    /// The `source` metadata value, if it is a string.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(keys::SOURCE).and_then(Value::as_str)
    }

    /// Copy of this document whose metadata holds only `source`.
    ///
    /// A missing source is recorded as `null`.
    #[must_use]
    pub fn to_minimal(&self) -> Self {
        let source = self
            .metadata
            .get(keys::SOURCE)
            .cloned()
            .unwrap_or(Value::Null);

        let mut metadata = Metadata::with_capacity(1);
        metadata.insert(keys::SOURCE.to_string(), source);

        Self {
            page_content: self.page_content.clone(),
            metadata,
        }
    }
}

// ============================================================================
// Embedding
// ============================================================================

/// Configuration for embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Normalize embeddings to unit length
    pub normalize: bool,
    /// Batch size for processing
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            batch_size: 32,
        }
    }
}

/// Output from embedding.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    /// The embedding vector
    pub embedding: Vec<f32>,
    /// Number of tokens in input (after truncation)
    pub token_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== Document Tests ====================

    #[test]
    fn test_document_new_has_empty_metadata() {
        let doc = Document::new("hello");
        assert_eq!(doc.page_content, "hello");
        assert!(doc.metadata.is_empty());
        assert!(doc.source().is_none());
    }

    #[test]
    fn test_document_source() {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), json!("/docs/report.pdf"));
        let doc = Document::with_metadata("text", metadata);

        assert_eq!(doc.source(), Some("/docs/report.pdf"));
    }

    #[test]
    fn test_document_source_non_string_is_none() {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), Value::Null);
        let doc = Document::with_metadata("text", metadata);

        assert!(doc.source().is_none());
    }

    #[test]
    fn test_to_minimal_keeps_only_source() {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), json!("/docs/a.pdf"));
        metadata.insert("page".to_string(), json!(3));
        metadata.insert("author".to_string(), json!("Ada"));
        let doc = Document::with_metadata("page four", metadata);

        let minimal = doc.to_minimal();

        assert_eq!(minimal.page_content, "page four");
        assert_eq!(minimal.metadata.len(), 1);
        assert_eq!(minimal.metadata["source"], json!("/docs/a.pdf"));
        // input untouched
        assert_eq!(doc.metadata.len(), 3);
    }

    #[test]
    fn test_to_minimal_missing_source_is_null() {
        let doc = Document::new("orphan");
        let minimal = doc.to_minimal();

        assert_eq!(minimal.metadata.len(), 1);
        assert_eq!(minimal.metadata["source"], Value::Null);
    }

    #[test]
    fn test_document_serialization() {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), json!("/docs/a.pdf"));
        metadata.insert("page".to_string(), json!(0));
        let doc = Document::with_metadata("content", metadata);

        let json = serde_json::to_string(&doc).unwrap();
        let deserialized: Document = serde_json::from_str(&json).unwrap();

        assert_eq!(doc, deserialized);
    }

    #[test]
    fn test_document_deserialize_without_metadata() {
        let doc: Document = serde_json::from_str(r#"{"page_content":"x"}"#).unwrap();
        assert_eq!(doc.page_content, "x");
        assert!(doc.metadata.is_empty());
    }

    // ==================== EmbeddingConfig Tests ====================

    #[test]
    fn test_embedding_config_default() {
        let config = EmbeddingConfig::default();
        assert!(config.normalize);
        assert_eq!(config.batch_size, 32);
    }
}
