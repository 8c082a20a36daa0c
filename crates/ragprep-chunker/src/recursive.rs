//! Recursive character splitting with overlap.
//!
//! Text is cut at the coarsest separator that occurs in it (paragraph, then
//! line, then word, then character). Pieces that are still too long are
//! split again with the finer separators; short pieces are merged back into
//! windows of at most `chunk_size` characters, each window starting with up
//! to `chunk_overlap` characters carried over from the previous one.

use ragprep_core::{ChunkError, Document, Metadata, TextSplitter, keys, parent_metadata};
use serde_json::{Value, json};
use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::config::{KeepSeparator, SplitterConfig};

/// Splitter that recursively tries an ordered list of separators.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterTextSplitter {
    config: SplitterConfig,
}

impl RecursiveCharacterTextSplitter {
    /// Create a splitter, validating the configuration.
    pub fn new(config: SplitterConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a splitter with default separators and the given sizes.
    pub fn with_sizes(chunk_size: usize, chunk_overlap: usize) -> Result<Self, ChunkError> {
        Self::new(SplitterConfig {
            chunk_size,
            chunk_overlap,
            ..SplitterConfig::default()
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        // Coarsest separator present in the text; "" always matches.
        let mut separator = separators.last().map_or("", String::as_str);
        let mut finer: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate.as_str();
                finer = &separators[i + 1..];
                break;
            }
        }

        let keep = self.config.keep_separator;
        let splits = split_on_separator(text, separator, keep);
        let merge_separator = if keep == KeepSeparator::None {
            separator
        } else {
            ""
        };

        let mut good_splits: Vec<String> = Vec::new();
        for split in splits {
            if char_len(&split) < self.config.chunk_size {
                good_splits.push(split);
                continue;
            }

            if !good_splits.is_empty() {
                final_chunks.extend(self.merge_splits(&good_splits, merge_separator));
                good_splits.clear();
            }
            if finer.is_empty() {
                final_chunks.push(split);
            } else {
                final_chunks.extend(self.split_recursive(&split, finer));
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits, merge_separator));
        }

        final_chunks
    }

    /// Combine small pieces into windows no longer than `chunk_size`.
    fn merge_splits(&self, splits: &[String], separator: &str) -> Vec<String> {
        let chunk_size = self.config.chunk_size;
        let chunk_overlap = self.config.chunk_overlap;
        let separator_len = char_len(separator);

        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for split in splits {
            let len = char_len(split);
            let joiner = if current.is_empty() { 0 } else { separator_len };

            if total + len + joiner > chunk_size {
                if total > chunk_size {
                    warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total, chunk_size
                    );
                }
                if !current.is_empty() {
                    if let Some(doc) = self.join_docs(&current, separator) {
                        docs.push(doc);
                    }
                    // Drop from the front until what is left fits in the
                    // overlap and leaves room for the next piece.
                    loop {
                        let joiner = if current.is_empty() { 0 } else { separator_len };
                        let too_much = total > chunk_overlap
                            || (total + len + joiner > chunk_size && total > 0);
                        if !too_much {
                            break;
                        }
                        let had_more = current.len() > 1;
                        let Some(first) = current.pop_front() else {
                            break;
                        };
                        let removed = char_len(first) + if had_more { separator_len } else { 0 };
                        total = total.saturating_sub(removed);
                    }
                }
            }

            current.push_back(split.as_str());
            total += len + if current.len() > 1 { separator_len } else { 0 };
        }

        if let Some(doc) = self.join_docs(&current, separator) {
            docs.push(doc);
        }
        docs
    }

    fn join_docs(&self, docs: &VecDeque<&str>, separator: &str) -> Option<String> {
        let parts: Vec<&str> = docs.iter().copied().collect();
        let text = parts.join(separator);
        let text = if self.config.strip_whitespace {
            text.trim().to_string()
        } else {
            text
        };
        (!text.is_empty()).then_some(text)
    }
}

impl TextSplitter for RecursiveCharacterTextSplitter {
    fn split_text(&self, text: &str) -> Result<Vec<String>, ChunkError> {
        Ok(self.split_recursive(text, &self.config.separators.0))
    }

    fn create_documents(
        &self,
        texts: &[&str],
        metadatas: Option<&[Metadata]>,
    ) -> Result<Vec<Document>, ChunkError> {
        let parents = parent_metadata(texts.len(), metadatas)?;

        let mut documents = Vec::new();
        for (text, parent) in texts.iter().zip(parents) {
            let mut index = 0i64;
            let mut previous_len = 0i64;

            for chunk in self.split_text(text)? {
                let mut metadata = parent.clone();
                if self.config.add_start_index {
                    let from = (index + previous_len - self.config.chunk_overlap as i64).max(0);
                    let start = find_from(text, &chunk, from as usize);
                    metadata.insert(
                        keys::START_INDEX.to_string(),
                        start.map_or(Value::Null, |s| json!(s)),
                    );
                    if let Some(start) = start {
                        index = start as i64;
                    }
                    previous_len = char_len(&chunk) as i64;
                }
                documents.push(Document::with_metadata(chunk, metadata));
            }
        }

        debug!(
            "Split {} texts into {} chunks (size {}, overlap {})",
            texts.len(),
            documents.len(),
            self.config.chunk_size,
            self.config.chunk_overlap
        );
        Ok(documents)
    }
}

/// Split documents into overlapping chunks with the default separators.
///
/// Chunks keep their parent's metadata and follow input order.
pub fn split_documents(
    documents: &[Document],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<Document>, ChunkError> {
    RecursiveCharacterTextSplitter::with_sizes(chunk_size, chunk_overlap)?
        .split_documents(documents)
}

/// Length in characters.
fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split on a literal separator, optionally re-attaching it to the pieces.
/// Empty pieces are dropped; an empty separator splits into characters.
fn split_on_separator(text: &str, separator: &str, keep: KeepSeparator) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let parts: Vec<&str> = text.split(separator).collect();
    let last = parts.len() - 1;
    let pieces: Vec<String> = match keep {
        KeepSeparator::Start => parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                if i == 0 {
                    (*part).to_string()
                } else {
                    format!("{separator}{part}")
                }
            })
            .collect(),
        KeepSeparator::End => parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                if i == last {
                    (*part).to_string()
                } else {
                    format!("{part}{separator}")
                }
            })
            .collect(),
        KeepSeparator::None => parts.iter().map(|part| (*part).to_string()).collect(),
    };

    pieces.into_iter().filter(|p| !p.is_empty()).collect()
}

/// Character offset of `needle` in `haystack`, searching from character
/// offset `from`.
fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let byte_from = haystack
        .char_indices()
        .nth(from)
        .map_or(haystack.len(), |(i, _)| i);
    let byte_pos = haystack[byte_from..].find(needle)? + byte_from;
    Some(haystack[..byte_pos].chars().count())
}
