//! Core traits for ragprep components.
//!
//! - [`DocumentLoader`]: Turn files into documents
//! - [`TextSplitter`]: Split documents into chunks
//! - [`Embedder`]: Generate vector embeddings
//!
//! These traits let the extract, chunker and embed crates be swapped
//! without changing the caller.

use async_trait::async_trait;

use crate::error::{ChunkError, EmbedError, LoadError};
use crate::types::{Document, EmbeddingConfig, EmbeddingOutput, Metadata};

// ============================================================================
// Loading
// ============================================================================

/// Trait for loading documents from a source.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Load all documents, in source order.
    async fn load(&self) -> Result<Vec<Document>, LoadError>;
}

// ============================================================================
// Splitting
// ============================================================================

/// Trait for splitting text into chunks.
pub trait TextSplitter: Send + Sync {
    /// Split a single text into chunks.
    fn split_text(&self, text: &str) -> Result<Vec<String>, ChunkError>;

    /// Build chunk documents from texts and their (optional) metadata.
    ///
    /// Every chunk of `texts[i]` receives a copy of `metadatas[i]`.
    fn create_documents(
        &self,
        texts: &[&str],
        metadatas: Option<&[Metadata]>,
    ) -> Result<Vec<Document>, ChunkError> {
        let parents = parent_metadata(texts.len(), metadatas)?;

        let mut documents = Vec::new();
        for (text, metadata) in texts.iter().zip(parents) {
            for chunk in self.split_text(text)? {
                documents.push(Document::with_metadata(chunk, metadata.clone()));
            }
        }
        Ok(documents)
    }

    /// Split documents, keeping each parent's metadata on its chunks.
    fn split_documents(&self, documents: &[Document]) -> Result<Vec<Document>, ChunkError> {
        let texts: Vec<&str> = documents.iter().map(|d| d.page_content.as_str()).collect();
        let metadatas: Vec<Metadata> = documents.iter().map(|d| d.metadata.clone()).collect();
        self.create_documents(&texts, Some(&metadatas))
    }
}

/// Metadata for each of `count` texts: a copy of `metadatas`, or empty maps
/// when none are given. Fails when the lengths differ.
pub fn parent_metadata(
    count: usize,
    metadatas: Option<&[Metadata]>,
) -> Result<Vec<Metadata>, ChunkError> {
    match metadatas {
        Some(metadatas) if metadatas.len() != count => Err(ChunkError::Failed(format!(
            "got {} texts but {} metadata entries",
            count,
            metadatas.len()
        ))),
        Some(metadatas) => Ok(metadatas.to_vec()),
        None => Ok(vec![Metadata::new(); count]),
    }
}

// ============================================================================
// Embedding
// ============================================================================

/// Trait for generating embeddings.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model name/identifier.
    fn model_name(&self) -> &str;

    /// Embedding dimension.
    fn dimension(&self) -> usize;

    /// Maximum tokens per input.
    fn max_tokens(&self) -> usize;

    /// Embed text content.
    async fn embed_text(
        &self,
        texts: &[&str],
        config: &EmbeddingConfig,
    ) -> Result<Vec<EmbeddingOutput>, EmbedError>;

    /// Embed a query.
    async fn embed_query(
        &self,
        query: &str,
        config: &EmbeddingConfig,
    ) -> Result<EmbeddingOutput, EmbedError> {
        let results = self.embed_text(&[query], config).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::Inference("empty embedding result".to_string()))
    }

    /// Embed documents with the default config, returning bare vectors.
    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let outputs = self.embed_text(texts, &EmbeddingConfig::default()).await?;
        Ok(outputs.into_iter().map(|o| o.embedding).collect())
    }
}
