//! # ragprep-embed
//!
//! Local sentence embeddings for ragprep using the Candle ML framework.
//! Models are fetched from the Hugging Face Hub on first use and cached.
//!
//! ## Cargo Features
//!
//! - `candle` (default): Enables the Candle ML stack for real embeddings
//! - Without `candle`: Only [`NoopEmbedder`] and [`EmbeddingOptions`] are available
//!
//! ## Default Model
//!
//! | Property | Value |
//! |----------|-------|
//! | Model | `sentence-transformers/all-MiniLM-L6-v2` |
//! | Dimension | 384 |
//! | Max tokens | 512 |
//! | Architecture | BERT-based |
//!
//! Any BERT-family model id works; dimension and token limit are read from
//! the model's `config.json`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ragprep_core::Embedder;
//! use ragprep_embed::{DEFAULT_MODEL, download_embeddings};
//!
//! let embedder = download_embeddings(DEFAULT_MODEL).await?;
//! let vectors = embedder.embed_documents(&["Hello world", "Machine learning"]).await?;
//! // Each vector has 384 dimensions
//! ```

#[cfg(feature = "candle")]
pub mod candle;
pub mod factory;
pub mod noop;

#[cfg(feature = "candle")]
pub use candle::CandleEmbedder;
#[cfg(feature = "candle")]
pub use factory::{download_embeddings, download_embeddings_with};
pub use factory::{DEFAULT_MODEL, EmbeddingOptions};
pub use noop::NoopEmbedder;
