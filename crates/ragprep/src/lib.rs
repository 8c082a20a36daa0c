//! # ragprep
//!
//! The ingestion half of a retrieval-augmented generation pipeline:
//!
//! 1. [`load_pdfs_from_directory`]: one [`Document`] per PDF page
//! 2. [`filter_to_minimal_docs`]: keep only content and `source`
//! 3. [`split_documents`]: overlapping chunks of at most `chunk_size` characters
//! 4. [`download_embeddings`]: a ready-to-use sentence embedding model
//!
//! The caller drives the steps; nothing here orchestrates them.
//!
//! ```rust,ignore
//! use ragprep::{Embedder, DEFAULT_MODEL};
//!
//! let docs = ragprep::load_pdfs_from_directory("data/").await?;
//! let docs = ragprep::filter_to_minimal_docs(&docs);
//! let chunks = ragprep::split_documents(&docs, 500, 50)?;
//!
//! let embedder = ragprep::download_embeddings(DEFAULT_MODEL).await?;
//! let texts: Vec<&str> = chunks.iter().map(|c| c.page_content.as_str()).collect();
//! let vectors = embedder.embed_documents(&texts).await?;
//! ```
//!
//! [`config`] and [`logging`] provide optional TOML configuration and a
//! `tracing` subscriber.

pub mod config;
pub mod logging;

use std::path::Path;

pub use ragprep_chunker::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, KeepSeparator, RecursiveCharacterTextSplitter,
    Separators, SplitterConfig,
};
pub use ragprep_core::{
    ChunkError, Document, DocumentLoader, EmbedError, Embedder, EmbeddingConfig, EmbeddingOutput,
    Error, LoadError, Metadata, Result, TextSplitter, filter_to_minimal_docs, keys,
};
#[cfg(feature = "candle")]
pub use ragprep_embed::{CandleEmbedder, download_embeddings_with};
pub use ragprep_embed::{DEFAULT_MODEL, EmbeddingOptions, NoopEmbedder};
pub use ragprep_extract::{DirectoryLoader, PdfLoader};

pub use config::Config;
pub use logging::init_logging;

/// Load every `*.pdf` directly inside `directory_path`, one document per
/// page, files in path order.
pub async fn load_pdfs_from_directory(directory_path: impl AsRef<Path>) -> Result<Vec<Document>> {
    Ok(ragprep_extract::load_pdfs_from_directory(directory_path).await?)
}

/// Split documents into chunks of at most `chunk_size` characters, with
/// `chunk_overlap` characters shared between neighbours.
///
/// The usual values are [`DEFAULT_CHUNK_SIZE`] and [`DEFAULT_CHUNK_OVERLAP`].
pub fn split_documents(
    documents: &[Document],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<Document>> {
    Ok(ragprep_chunker::split_documents(
        documents,
        chunk_size,
        chunk_overlap,
    )?)
}

/// Load the named embedding model, downloading it on first use.
///
/// The usual value is [`DEFAULT_MODEL`]. Models are cached under
/// [`config::model_cache_dir`] (`<data dir>/models`, or
/// `$RAGPREP_DATA_DIR/models`), the same place a [`Config`] without an
/// explicit `cache_dir` uses. [`download_embeddings_with`] caches wherever
/// its options say, and in the Hugging Face Hub cache when `cache_dir` is
/// `None`.
#[cfg(feature = "candle")]
pub async fn download_embeddings(model_name: &str) -> Result<CandleEmbedder> {
    let options = config::default_embedding_options(model_name);
    Ok(ragprep_embed::download_embeddings_with(options).await?)
}
