//! Configuration handling for ragprep.
//!
//! Every field has a default equal to the library default, so an empty
//! file is a valid configuration.

use directories::ProjectDirs;
use ragprep_chunker::{KeepSeparator, Separators, SplitterConfig};
use ragprep_core::{EmbeddingConfig, Error, Result};
use ragprep_embed::{DEFAULT_MODEL, EmbeddingOptions};
use ragprep_extract::DirectoryLoader;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Directory scan configuration
    #[serde(default)]
    pub loader: LoaderSection,

    /// Chunk splitting configuration
    #[serde(default)]
    pub splitter: SplitterSection,

    /// Embedding model configuration
    #[serde(default)]
    pub embedding: EmbeddingSection,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// A directory loader for `dir` using the `[loader]` settings.
    pub fn directory_loader(&self, dir: impl Into<PathBuf>) -> DirectoryLoader {
        DirectoryLoader::new(dir)
            .with_glob(&self.loader.glob)
            .recursive(self.loader.recursive)
            .load_hidden(self.loader.load_hidden)
            .silent_errors(self.loader.silent_errors)
    }
}

/// Directory scan configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderSection {
    /// Pattern matched against paths relative to the directory
    #[serde(default = "default_glob")]
    pub glob: String,

    /// Descend into subdirectories
    #[serde(default)]
    pub recursive: bool,

    /// Include dot-files and dot-directories
    #[serde(default)]
    pub load_hidden: bool,

    /// Skip unreadable files instead of failing
    #[serde(default)]
    pub silent_errors: bool,
}

fn default_glob() -> String {
    ragprep_extract::directory::DEFAULT_GLOB.to_string()
}

impl Default for LoaderSection {
    fn default() -> Self {
        Self {
            glob: default_glob(),
            recursive: false,
            load_hidden: false,
            silent_errors: false,
        }
    }
}

/// Chunk splitting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitterSection {
    /// Maximum chunk length (characters)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between chunks (characters)
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Separators tried in order, coarsest first
    #[serde(default)]
    pub separators: Separators,

    /// "start", "end" or "none"
    #[serde(default)]
    pub keep_separator: KeepSeparator,

    #[serde(default = "default_strip_whitespace")]
    pub strip_whitespace: bool,

    #[serde(default)]
    pub add_start_index: bool,
}

fn default_chunk_size() -> usize {
    ragprep_chunker::DEFAULT_CHUNK_SIZE
}

fn default_chunk_overlap() -> usize {
    ragprep_chunker::DEFAULT_CHUNK_OVERLAP
}

fn default_strip_whitespace() -> bool {
    true
}

impl Default for SplitterSection {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            separators: Separators::default(),
            keep_separator: KeepSeparator::default(),
            strip_whitespace: default_strip_whitespace(),
            add_start_index: false,
        }
    }
}

impl From<SplitterSection> for SplitterConfig {
    fn from(section: SplitterSection) -> Self {
        Self {
            chunk_size: section.chunk_size,
            chunk_overlap: section.chunk_overlap,
            separators: section.separators,
            keep_separator: section.keep_separator,
            strip_whitespace: section.strip_whitespace,
            add_start_index: section.add_start_index,
        }
    }
}

/// Embedding model configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingSection {
    /// Hugging Face Hub model id
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Model revision (branch, tag or commit)
    #[serde(default)]
    pub revision: Option<String>,

    /// Batch size for embedding
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// L2-normalize vectors
    #[serde(default = "default_normalize")]
    pub normalize: bool,

    /// Use GPU if available
    #[serde(default = "default_use_gpu")]
    pub use_gpu: bool,

    /// Model download cache; `<data dir>/models` when unset
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

fn default_embedding_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_batch_size() -> usize {
    32
}

fn default_normalize() -> bool {
    true
}

fn default_use_gpu() -> bool {
    true
}

impl Default for EmbeddingSection {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            revision: None,
            batch_size: default_batch_size(),
            normalize: default_normalize(),
            use_gpu: default_use_gpu(),
            cache_dir: None,
        }
    }
}

impl EmbeddingSection {
    /// Model selection for the embedding factory.
    pub fn options(&self) -> EmbeddingOptions {
        EmbeddingOptions {
            model: self.model.clone(),
            revision: self.revision.clone(),
            cache_dir: self.cache_dir.clone().or_else(model_cache_dir),
            use_gpu: self.use_gpu,
        }
    }

    /// Per-call settings for [`Embedder::embed_text`](ragprep_core::Embedder::embed_text).
    pub fn embedding_config(&self) -> EmbeddingConfig {
        EmbeddingConfig {
            normalize: self.normalize,
            batch_size: self.batch_size,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Get the data directory for ragprep.
pub fn data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("RAGPREP_DATA_DIR") {
        return Some(PathBuf::from(dir));
    }

    ProjectDirs::from("", "", "ragprep").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Get the config directory for ragprep.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("RAGPREP_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }

    ProjectDirs::from("", "", "ragprep").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default location for downloaded models.
pub fn model_cache_dir() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("models"))
}

/// Options for `model` caching under [`model_cache_dir`], as used by
/// [`download_embeddings`](crate::download_embeddings) and by an
/// `[embedding]` section without `cache_dir`.
pub fn default_embedding_options(model: impl Into<String>) -> EmbeddingOptions {
    EmbeddingOptions {
        cache_dir: model_cache_dir(),
        ..EmbeddingOptions::new(model)
    }
}
