//! No-op embedder for testing without Candle.
//!
//! [`NoopEmbedder`] returns zero-vectors for all inputs. It stands in for a
//! real model in tests and in builds without the `candle` feature.

use async_trait::async_trait;
use ragprep_core::{EmbedError, Embedder, EmbeddingConfig, EmbeddingOutput};

/// No-op embedder that returns zero-vectors.
///
/// # Example
///
/// ```rust
/// use ragprep_embed::NoopEmbedder;
/// use ragprep_core::Embedder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let embedder = NoopEmbedder::new();
/// let vectors = embedder.embed_documents(&["Hello", "World"]).await?;
///
/// assert_eq!(vectors.len(), 2);
/// assert_eq!(vectors[0].len(), 384);
/// assert!(vectors[0].iter().all(|&v| v == 0.0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NoopEmbedder {
    dimension: usize,
}

impl NoopEmbedder {
    /// Create a new no-op embedder with default dimension (384).
    #[must_use]
    pub fn new() -> Self {
        Self { dimension: 384 }
    }

    /// Create a new no-op embedder with custom dimension.
    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for NoopEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for NoopEmbedder {
    fn model_name(&self) -> &str {
        "noop"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn max_tokens(&self) -> usize {
        512
    }

    async fn embed_text(
        &self,
        texts: &[&str],
        _config: &EmbeddingConfig,
    ) -> Result<Vec<EmbeddingOutput>, EmbedError> {
        Ok(texts
            .iter()
            .map(|_| EmbeddingOutput {
                embedding: vec![0.0; self.dimension],
                token_count: 0,
            })
            .collect())
    }
}
