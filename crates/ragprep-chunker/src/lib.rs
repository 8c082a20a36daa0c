//! Text splitting for ragprep.
//!
//! [`RecursiveCharacterTextSplitter`] cuts text at paragraph, line, word and
//! finally character boundaries, producing chunks of at most `chunk_size`
//! characters with `chunk_overlap` characters shared between neighbours.
//!
//! ```
//! use ragprep_chunker::split_documents;
//! use ragprep_core::Document;
//!
//! let docs = vec![Document::new("First paragraph.\n\nSecond paragraph.")];
//! let chunks = split_documents(&docs, 20, 0).unwrap();
//! assert_eq!(chunks.len(), 2);
//! ```

pub mod config;
pub mod recursive;

pub use config::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, KeepSeparator, Separators, SplitterConfig,
};
pub use recursive::{RecursiveCharacterTextSplitter, split_documents};
