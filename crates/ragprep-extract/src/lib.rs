//! # ragprep-extract
//!
//! Document loaders that turn PDF files into [`Document`](ragprep_core::Document)s
//! for downstream splitting and embedding.
//!
//! ## Loaders
//!
//! | Loader | Input | Output |
//! |--------|-------|--------|
//! | [`PdfLoader`] | one `.pdf` file | one document per page |
//! | [`DirectoryLoader`] | a directory + glob (default `*.pdf`) | documents of every matching file, in path order |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ragprep_core::DocumentLoader;
//! use ragprep_extract::{DirectoryLoader, load_pdfs_from_directory};
//!
//! // Flat scan for *.pdf
//! let docs = load_pdfs_from_directory("data/").await?;
//!
//! // Or configure the scan
//! let docs = DirectoryLoader::new("data/")
//!     .recursive(true)
//!     .silent_errors(true)
//!     .load()
//!     .await?;
//! ```
//!
//! ## Page Metadata
//!
//! Every page document carries `source`, `page` (0-based) and `total_pages`,
//! plus `title`, `author`, `subject`, `creator`, `producer`, `creationdate`
//! and `moddate` when the PDF Info dictionary has them.

pub mod directory;
pub mod pdf;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use directory::{DirectoryLoader, load_pdfs_from_directory};
pub use pdf::PdfLoader;
