//! Directory loader: scans a directory for files matching a glob and loads
//! each one with [`PdfLoader`].

use async_trait::async_trait;
use glob::Pattern;
use ragprep_core::{Document, DocumentLoader, LoadError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::pdf::PdfLoader;

/// Default file pattern.
pub const DEFAULT_GLOB: &str = "*.pdf";

/// Loads every matching PDF in a directory.
///
/// Files are loaded one after another in lexicographic path order, pages
/// in page order.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    path: PathBuf,
    glob: String,
    recursive: bool,
    load_hidden: bool,
    silent_errors: bool,
}

impl DirectoryLoader {
    /// Create a loader for `path` with the `*.pdf` glob, non-recursive.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            glob: DEFAULT_GLOB.to_string(),
            recursive: false,
            load_hidden: false,
            silent_errors: false,
        }
    }

    /// Set the glob matched against paths relative to the directory.
    #[must_use]
    pub fn with_glob(mut self, glob: impl Into<String>) -> Self {
        self.glob = glob.into();
        self
    }

    /// Descend into subdirectories.
    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Include dot-files and dot-directories.
    #[must_use]
    pub fn load_hidden(mut self, load_hidden: bool) -> Self {
        self.load_hidden = load_hidden;
        self
    }

    /// Log and skip files that fail to load instead of failing.
    #[must_use]
    pub fn silent_errors(mut self, silent_errors: bool) -> Self {
        self.silent_errors = silent_errors;
        self
    }

    /// The directory being scanned.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List the files that [`load`](DocumentLoader::load) would read, sorted.
    pub fn discover(&self) -> Result<Vec<PathBuf>, LoadError> {
        if !self.path.exists() {
            return Err(LoadError::DirectoryNotFound(self.path.clone()));
        }
        if !self.path.is_dir() {
            return Err(LoadError::NotADirectory(self.path.clone()));
        }

        let pattern = Pattern::new(&self.glob).map_err(|e| LoadError::InvalidGlob {
            pattern: self.glob.clone(),
            message: e.to_string(),
        })?;

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let load_hidden = self.load_hidden;

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || load_hidden || !is_hidden(e))
        {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.path)
                .unwrap_or(entry.path());
            if pattern.matches_path(relative) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        debug!(
            "Found {} files matching {:?} in {:?}",
            files.len(),
            self.glob,
            self.path
        );
        Ok(files)
    }
}

#[async_trait]
impl DocumentLoader for DirectoryLoader {
    async fn load(&self) -> Result<Vec<Document>, LoadError> {
        let files = self.discover()?;

        let mut documents = Vec::new();
        let mut loaded_files = 0usize;
        for file in &files {
            match PdfLoader::new(file).load().await {
                Ok(docs) => {
                    loaded_files += 1;
                    documents.extend(docs);
                }
                Err(e) if self.silent_errors => {
                    warn!("Skipping {:?}: {}", file, e);
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Loaded {} documents from {} files in {:?}",
            documents.len(),
            loaded_files,
            self.path
        );
        Ok(documents)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Load every `*.pdf` directly inside `directory_path`, one document per page.
pub async fn load_pdfs_from_directory(
    directory_path: impl AsRef<Path>,
) -> Result<Vec<Document>, LoadError> {
    DirectoryLoader::new(directory_path.as_ref()).load().await
}
