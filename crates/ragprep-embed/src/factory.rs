//! Embedding model factory.

use std::path::PathBuf;

#[cfg(feature = "candle")]
use crate::candle::CandleEmbedder;
#[cfg(feature = "candle")]
use ragprep_core::EmbedError;
#[cfg(feature = "candle")]
use tracing::info;

/// Model used when none is named.
pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Which model to load and where to cache it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingOptions {
    /// Hugging Face Hub model id.
    pub model: String,
    /// Branch, tag or commit; the hub default when `None`.
    pub revision: Option<String>,
    /// Download cache; the hub's own cache when `None`.
    pub cache_dir: Option<PathBuf>,
    /// Run on CUDA device 0 when one is available.
    pub use_gpu: bool,
}

impl Default for EmbeddingOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl EmbeddingOptions {
    /// Options for `model` with the hub defaults.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            revision: None,
            cache_dir: None,
            use_gpu: true,
        }
    }

    #[must_use]
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    #[must_use]
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    #[must_use]
    pub fn with_gpu(mut self, use_gpu: bool) -> Self {
        self.use_gpu = use_gpu;
        self
    }
}

/// Download (or reuse from the Hugging Face Hub cache) and load the named
/// model.
///
/// Pass [`DEFAULT_MODEL`] for `sentence-transformers/all-MiniLM-L6-v2`.
#[cfg(feature = "candle")]
pub async fn download_embeddings(model_name: &str) -> Result<CandleEmbedder, EmbedError> {
    download_embeddings_with(EmbeddingOptions::new(model_name)).await
}

/// Load a model with explicit options. The returned handle is ready to
/// embed; every call builds an independent handle.
#[cfg(feature = "candle")]
pub async fn download_embeddings_with(
    options: EmbeddingOptions,
) -> Result<CandleEmbedder, EmbedError> {
    info!("Loading embedding model {}", options.model);
    let embedder = CandleEmbedder::new(options);
    embedder.init().await?;
    Ok(embedder)
}
