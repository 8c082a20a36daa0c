//! Splitter configuration.

use ragprep_core::ChunkError;
use serde::{Deserialize, Serialize};

/// Default maximum chunk length, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default overlap between consecutive chunks, in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Ordered separators, coarsest first. An empty string splits into
/// characters and ends the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Separators(pub Vec<String>);

impl Default for Separators {
    fn default() -> Self {
        Self::from(vec!["\n\n", "\n", " ", ""])
    }
}

impl From<Vec<&str>> for Separators {
    fn from(separators: Vec<&str>) -> Self {
        Self(separators.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for Separators {
    fn from(separators: Vec<String>) -> Self {
        Self(separators)
    }
}

/// Where a separator goes once the text has been cut on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeepSeparator {
    /// Prefix the following piece.
    #[default]
    Start,
    /// Suffix the preceding piece.
    End,
    /// Drop it from the pieces and use it to re-join merged pieces.
    None,
}

/// Configuration for [`RecursiveCharacterTextSplitter`](crate::RecursiveCharacterTextSplitter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters carried over from the end of one chunk to the next.
    pub chunk_overlap: usize,
    pub separators: Separators,
    pub keep_separator: KeepSeparator,
    /// Trim whitespace from both ends of every chunk.
    pub strip_whitespace: bool,
    /// Record each chunk's character offset in its parent as `start_index`.
    ///
    /// The offset is found by searching the parent from just before the end
    /// of the previous chunk. It is `null` when the chunk text does not occur
    /// there, which happens with [`KeepSeparator::None`] when merged pieces
    /// are re-joined with one separator where the parent had several. The
    /// search for the next chunk then continues from the last offset found.
    pub add_start_index: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: Separators::default(),
            keep_separator: KeepSeparator::default(),
            strip_whitespace: true,
            add_start_index: false,
        }
    }
}

impl SplitterConfig {
    /// Check the size constraints.
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.chunk_size == 0 {
            return Err(ChunkError::InvalidConfig(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.chunk_overlap > self.chunk_size {
            return Err(ChunkError::InvalidConfig(format!(
                "chunk_overlap ({}) is larger than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}
