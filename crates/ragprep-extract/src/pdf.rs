//! PDF loader.
//!
//! Uses pdf-extract for per-page text and lopdf for the page count and
//! the document Info dictionary.

use async_trait::async_trait;
use lopdf::Object;
use ragprep_core::{Document, DocumentLoader, LoadError, Metadata, keys};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Info dictionary entries copied into page metadata.
const INFO_KEYS: &[(&[u8], &str)] = &[
    (b"Title", "title"),
    (b"Author", "author"),
    (b"Subject", "subject"),
    (b"Creator", "creator"),
    (b"Producer", "producer"),
    (b"CreationDate", "creationdate"),
    (b"ModDate", "moddate"),
];

/// Loader for a single PDF file, producing one document per page.
#[derive(Debug, Clone)]
pub struct PdfLoader {
    path: PathBuf,
}

impl PdfLoader {
    /// Create a loader for the PDF at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file this loader reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse_error(&self, message: impl Into<String>) -> LoadError {
        LoadError::Parse {
            path: self.path.clone(),
            message: message.into(),
        }
    }

    /// Run a parser on the blocking pool. Parsing is CPU-bound and
    /// pdf-extract may panic on malformed input; a panic surfaces here as a
    /// join error.
    async fn run_parser<F>(&self, parse: F) -> Result<ExtractedPdf, LoadError>
    where
        F: FnOnce() -> Result<ExtractedPdf, String> + Send + 'static,
    {
        tokio::task::spawn_blocking(parse)
            .await
            .map_err(|e| self.parse_error(format!("PDF parser aborted: {e}")))?
            .map_err(|e| self.parse_error(e))
    }
}

#[async_trait]
impl DocumentLoader for PdfLoader {
    async fn load(&self) -> Result<Vec<Document>, LoadError> {
        debug!("Loading PDF: {:?}", self.path);

        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoadError::FileNotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let extracted = self.run_parser(move || extract_pdf(&bytes)).await?;

        let source = self.path.to_string_lossy().to_string();
        let total_pages = extracted.pages.len();

        let mut base = Metadata::new();
        base.insert(keys::SOURCE.to_string(), json!(source));
        base.insert(keys::TOTAL_PAGES.to_string(), json!(total_pages));
        for (key, value) in extracted.info {
            base.insert(key.to_string(), Value::String(value));
        }

        let documents: Vec<Document> = extracted
            .pages
            .into_iter()
            .enumerate()
            .map(|(page, text)| {
                if text.trim().is_empty() {
                    debug!("No extractable text on page {} of {:?}", page, self.path);
                }
                let mut metadata = base.clone();
                metadata.insert(keys::PAGE.to_string(), json!(page));
                Document::with_metadata(text, metadata)
            })
            .collect();

        debug!("Loaded {} pages from {:?}", documents.len(), self.path);
        Ok(documents)
    }
}

/// Text and metadata pulled out of one PDF.
struct ExtractedPdf {
    pages: Vec<String>,
    info: Vec<(&'static str, String)>,
}

fn extract_pdf(bytes: &[u8]) -> Result<ExtractedPdf, String> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| e.to_string())?;
    let page_count = doc.get_pages().len();
    let info = read_info(&doc);

    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| e.to_string())?;

    Ok(ExtractedPdf {
        pages: pad_pages(pages, page_count),
        info,
    })
}

/// Keep one entry per page even when the text extractor skips some.
fn pad_pages(mut pages: Vec<String>, page_count: usize) -> Vec<String> {
    if pages.len() < page_count {
        pages.resize(page_count, String::new());
    }
    pages
}

/// Read the known string entries of the trailer's Info dictionary.
fn read_info(doc: &lopdf::Document) -> Vec<(&'static str, String)> {
    let Ok(info) = doc.trailer.get(b"Info") else {
        return Vec::new();
    };

    let dict = match info {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    };
    let Some(dict) = dict else {
        return Vec::new();
    };

    INFO_KEYS
        .iter()
        .filter_map(|(pdf_key, meta_key)| {
            let value = match dict.get(pdf_key).ok()? {
                Object::String(bytes, _) => decode_pdf_string(bytes),
                Object::Name(name) => String::from_utf8_lossy(name).to_string(),
                _ => return None,
            };
            let value = value.trim().to_string();
            (!value.is_empty()).then_some((*meta_key, value))
        })
        .collect()
}

/// Decode a PDF text string: UTF-16BE when it has a byte order mark,
/// otherwise one char per byte.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{PdfFixture, write_pdf};
    use tempfile::tempdir;

    #[test]
    fn test_decode_pdf_string_latin1() {
        assert_eq!(decode_pdf_string(b"Annual Report"), "Annual Report");
        assert_eq!(decode_pdf_string(&[0x43, 0x61, 0x66, 0xE9]), "Café");
    }

    #[test]
    fn test_decode_pdf_string_utf16() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_pdf_string(&bytes), "Hi");
    }

    #[tokio::test]
    async fn test_load_one_document_per_page() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("three.pdf");
        write_pdf(
            &path,
            &PdfFixture::new(&["Alpha page", "Bravo page", "Charlie page"]),
        );

        let docs = PdfLoader::new(&path).load().await.unwrap();

        assert_eq!(docs.len(), 3);
        assert!(docs[0].page_content.contains("Alpha"));
        assert!(docs[1].page_content.contains("Bravo"));
        assert!(docs[2].page_content.contains("Charlie"));

        let source = path.to_string_lossy().to_string();
        for (i, doc) in docs.iter().enumerate() {
            assert_eq!(doc.source(), Some(source.as_str()));
            assert_eq!(doc.metadata["page"], json!(i));
            assert_eq!(doc.metadata["total_pages"], json!(3));
        }
    }

    #[tokio::test]
    async fn test_load_reads_info_dictionary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("titled.pdf");
        write_pdf(
            &path,
            &PdfFixture::new(&["Body text"])
                .title("Quarterly Results")
                .author("Finance Team"),
        );

        let docs = PdfLoader::new(&path).load().await.unwrap();

        assert_eq!(docs[0].metadata["title"], json!("Quarterly Results"));
        assert_eq!(docs[0].metadata["author"], json!("Finance Team"));
        assert!(!docs[0].metadata.contains_key("subject"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.pdf");

        let err = PdfLoader::new(&path).load().await.unwrap_err();

        assert!(matches!(err, LoadError::FileNotFound(p) if p == path));
    }

    #[tokio::test]
    async fn test_load_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = PdfLoader::new(&path).load().await.unwrap_err();

        match err {
            LoadError::Parse { path: p, .. } => assert_eq!(p, path),
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_keeps_page_without_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gap.pdf");
        write_pdf(&path, &PdfFixture::new(&["Alpha", "", "Charlie"]));

        let docs = PdfLoader::new(&path).load().await.unwrap();

        assert_eq!(docs.len(), 3);
        assert!(docs[0].page_content.contains("Alpha"));
        assert!(docs[1].page_content.trim().is_empty());
        assert_eq!(docs[1].metadata["page"], json!(1));
        assert_eq!(docs[1].metadata["total_pages"], json!(3));
        assert_eq!(
            docs[1].source(),
            Some(path.to_string_lossy().to_string().as_str())
        );
        assert!(docs[2].page_content.contains("Charlie"));
    }

    #[test]
    fn test_pad_pages_fills_missing_pages() {
        let pages = pad_pages(vec!["one".to_string()], 3);
        assert_eq!(pages, vec!["one", "", ""]);

        let pages = pad_pages(vec!["a".to_string(), "b".to_string()], 1);
        assert_eq!(pages, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_parser_panic_is_parse_error() {
        let loader = PdfLoader::new("/docs/panics.pdf");

        let result = loader
            .run_parser(|| -> Result<ExtractedPdf, String> { panic!("bad xref") })
            .await;

        match result {
            Err(LoadError::Parse { path, message }) => {
                assert_eq!(path, Path::new("/docs/panics.pdf"));
                assert!(message.contains("PDF parser aborted"));
            }
            Err(other) => panic!("Expected Parse error, got {other:?}"),
            Ok(_) => panic!("Expected Parse error, got pages"),
        }
    }

    #[tokio::test]
    async fn test_parser_error_is_parse_error() {
        let loader = PdfLoader::new("/docs/broken.pdf");

        let result = loader
            .run_parser(|| Err("invalid file header".to_string()))
            .await;

        assert!(
            matches!(result, Err(LoadError::Parse { message, .. }) if message == "invalid file header")
        );
    }

    #[test]
    fn test_loader_path() {
        let loader = PdfLoader::new("/docs/a.pdf");
        assert_eq!(loader.path(), Path::new("/docs/a.pdf"));
    }
}
