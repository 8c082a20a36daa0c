//! Error types for ragprep.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ragprep operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Document loading failed
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// Splitting failed
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkError),

    /// Embedding model loading or inference failed
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbedError),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Document loading errors.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("expected directory, got file: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Splitting errors.
#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("chunking failed: {0}")]
    Failed(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Embedding errors.
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("model loading failed: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model not initialized: {0}")]
    NotInitialized(String),
}

/// Result type alias for ragprep operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    // ========== LoadError Tests ==========

    #[test]
    fn test_load_error_directory_not_found_display() {
        let err = LoadError::DirectoryNotFound(PathBuf::from("/missing/docs"));
        assert_eq!(err.to_string(), "directory not found: /missing/docs");
    }

    #[test]
    fn test_load_error_not_a_directory_display() {
        let err = LoadError::NotADirectory(PathBuf::from("/docs/a.pdf"));
        assert_eq!(
            err.to_string(),
            "expected directory, got file: /docs/a.pdf"
        );
    }

    #[test]
    fn test_load_error_parse_display() {
        let err = LoadError::Parse {
            path: PathBuf::from("/docs/broken.pdf"),
            message: "invalid file header".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse /docs/broken.pdf: invalid file header"
        );
    }

    #[test]
    fn test_load_error_invalid_glob_display() {
        let err = LoadError::InvalidGlob {
            pattern: "[".to_string(),
            message: "invalid range pattern".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid glob pattern '[': invalid range pattern"
        );
    }

    #[test]
    fn test_load_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: LoadError = io_err.into();
        assert!(matches!(err, LoadError::Io(_)));
        assert!(err.to_string().contains("access denied"));
    }

    // ========== ChunkError Tests ==========

    #[test]
    fn test_chunk_error_invalid_config_display() {
        let err = ChunkError::InvalidConfig("chunk_size must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: chunk_size must be > 0"
        );
    }

    // ========== EmbedError Tests ==========

    #[test]
    fn test_embed_error_model_load_display() {
        let err = EmbedError::ModelLoad("repository not found".to_string());
        assert_eq!(err.to_string(), "model loading failed: repository not found");
    }

    #[test]
    fn test_embed_error_inference_display() {
        let err = EmbedError::Inference("shape mismatch".to_string());
        assert_eq!(err.to_string(), "inference failed: shape mismatch");
    }

    // ========== Main Error Tests ==========

    #[test]
    fn test_error_from_load_error() {
        let load_err = LoadError::FileNotFound(PathBuf::from("/docs/gone.pdf"));
        let err: Error = load_err.into();
        assert!(matches!(err, Error::Load(_)));
        assert!(err.to_string().contains("/docs/gone.pdf"));
    }

    #[test]
    fn test_error_from_chunk_error() {
        let err: Error = ChunkError::Failed("too short".to_string()).into();
        assert!(matches!(err, Error::Chunking(_)));
        assert!(err.to_string().starts_with("chunking error"));
    }

    #[test]
    fn test_error_from_embed_error() {
        let err: Error = EmbedError::ModelLoad("missing model".to_string()).into();
        assert!(matches!(err, Error::Embedding(_)));
        assert!(err.to_string().contains("missing model"));
    }

    #[test]
    fn test_error_chain_io_to_load_to_main() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "a.pdf not found");
        let load_err: LoadError = io_err.into();
        let main_err: Error = load_err.into();

        assert!(matches!(main_err, Error::Load(LoadError::Io(_))));
        assert!(main_err.to_string().contains("load error"));
    }

    #[test]
    fn test_error_config_display() {
        let err = Error::Config("unknown log level".to_string());
        assert_eq!(err.to_string(), "config error: unknown log level");
    }
}
