//! # ragprep-core
//!
//! Core types and traits for ragprep, the ingestion half of a
//! retrieval-augmented generation pipeline.
//!
//! This crate provides the foundational abstractions used by the other crates:
//!
//! - **Documents**: [`Document`] pairs extracted text with a metadata map
//! - **Loading**: [`DocumentLoader`] trait for turning files into documents
//! - **Splitting**: [`TextSplitter`] trait for cutting documents into chunks
//! - **Embedding**: [`Embedder`] trait for converting text to vectors
//!
//! ## Pipeline
//!
//! The crates are used in sequence by an outside caller:
//!
//! ```text
//! directory → DocumentLoader → filter_to_minimal_docs → TextSplitter → Embedder
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Document`] | Page content plus metadata (`source`, `page`, ...) |
//! | [`Metadata`] | String-keyed map of JSON values |
//! | [`EmbeddingConfig`] | Batch size and normalization for embedding calls |
//! | [`EmbeddingOutput`] | One embedding vector with its token count |
//!
//! ## Example
//!
//! ```rust
//! use ragprep_core::{Document, filter_to_minimal_docs};
//! use serde_json::json;
//!
//! let mut doc = Document::new("Hello");
//! doc.metadata.insert("source".to_string(), json!("/docs/a.pdf"));
//! doc.metadata.insert("page".to_string(), json!(0));
//!
//! let minimal = filter_to_minimal_docs(&[doc]);
//! assert_eq!(minimal[0].metadata.len(), 1);
//! assert_eq!(minimal[0].source(), Some("/docs/a.pdf"));
//! ```
//!
//! ## Related Crates
//!
//! - `ragprep-extract`: PDF and directory loaders
//! - `ragprep-chunker`: Recursive character text splitter
//! - `ragprep-embed`: Embedding models with Candle

pub mod error;
pub mod reduce;
pub mod traits;
pub mod types;

pub use error::{ChunkError, EmbedError, Error, LoadError, Result};
pub use reduce::filter_to_minimal_docs;
pub use traits::*;
pub use types::*;
