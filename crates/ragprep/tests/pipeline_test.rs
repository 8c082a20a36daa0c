//! Integration tests for the ingestion pipeline.
//!
//! Tests the complete flow: load → reduce → split → embed.

mod common;

use common::{MockEmbedder, page_text, write_pdf};
use ragprep::{
    Config, Document, Embedder, Error, LoadError, TextSplitter, filter_to_minimal_docs,
    load_pdfs_from_directory, split_documents,
};
use serde_json::json;
use tempfile::tempdir;

const TEST_DIM: usize = 384;

#[tokio::test]
async fn test_three_page_pdf_end_to_end() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("handbook.pdf");
    let pages: Vec<String> = (0..3).map(page_text).collect();
    write_pdf(&path, &pages);
    let source = path.to_string_lossy().to_string();

    let docs = load_pdfs_from_directory(dir.path()).await.unwrap();
    assert_eq!(docs.len(), 3);
    assert!(docs.iter().all(|d| d.metadata.contains_key("page")));

    let minimal = filter_to_minimal_docs(&docs);
    assert_eq!(minimal.len(), 3);
    for (doc, original) in minimal.iter().zip(&docs) {
        assert_eq!(doc.metadata.len(), 1);
        assert_eq!(doc.source(), Some(source.as_str()));
        assert_eq!(doc.page_content, original.page_content);
    }

    let chunks = split_documents(&minimal, 500, 50).unwrap();
    assert!(chunks.len() >= 6, "expected at least 6 chunks, got {}", chunks.len());
    for chunk in &chunks {
        assert!(chunk.page_content.chars().count() <= 500);
        assert!(!chunk.page_content.is_empty());
        assert_eq!(chunk.source(), Some(source.as_str()));
    }
    assert!(chunks[0].page_content.contains("Page 0"));
    assert!(chunks.last().unwrap().page_content.contains("Page 2"));

    let embedder = MockEmbedder::new(TEST_DIM);
    let texts: Vec<&str> = chunks.iter().map(|c| c.page_content.as_str()).collect();
    let vectors = embedder.embed_documents(&texts).await.unwrap();
    assert_eq!(vectors.len(), chunks.len());
    assert!(vectors.iter().all(|v| v.len() == TEST_DIM));
}

#[tokio::test]
async fn test_every_document_traces_to_a_file() {
    let dir = tempdir().unwrap();
    let files: Vec<_> = ["a.pdf", "b.pdf", "c.pdf"]
        .iter()
        .map(|name| dir.path().join(name))
        .collect();
    for (i, file) in files.iter().enumerate() {
        write_pdf(file, &[format!("Document {i} body")]);
    }
    std::fs::write(dir.path().join("readme.txt"), "not a pdf").unwrap();

    let docs = load_pdfs_from_directory(dir.path()).await.unwrap();

    assert_eq!(docs.len(), 3);
    let sources: Vec<String> = files
        .iter()
        .map(|f| f.to_string_lossy().to_string())
        .collect();
    for doc in &docs {
        let source = doc.source().unwrap();
        assert!(sources.iter().any(|s| s == source));
    }
}

#[tokio::test]
async fn test_page_without_text_yields_no_chunk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gap.pdf");
    let pages = vec![page_text(0), String::new(), page_text(2)];
    write_pdf(&path, &pages);

    let docs = load_pdfs_from_directory(dir.path()).await.unwrap();
    assert_eq!(docs.len(), 3);
    assert!(docs[1].page_content.trim().is_empty());
    assert_eq!(docs[1].metadata["page"], json!(1));

    let chunks = split_documents(&filter_to_minimal_docs(&docs), 500, 50).unwrap();

    assert!(!chunks.is_empty());
    assert!(chunks.iter().all(|c| !c.page_content.trim().is_empty()));
    assert!(chunks.iter().all(|c| !c.page_content.contains("Page 1 ")));
    assert!(chunks.iter().any(|c| c.page_content.contains("Page 0")));
    assert!(chunks.iter().any(|c| c.page_content.contains("Page 2")));
}

#[tokio::test]
async fn test_missing_directory_is_a_load_error() {
    let dir = tempdir().unwrap();

    let err = load_pdfs_from_directory(dir.path().join("missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Load(LoadError::DirectoryNotFound(_))));
}

#[test]
fn test_reducer_is_idempotent() {
    let mut doc = Document::new("Body");
    doc.metadata.insert("source".to_string(), json!("/a.pdf"));
    doc.metadata.insert("page".to_string(), json!(4));
    let no_source = Document::new("Orphan");

    let once = filter_to_minimal_docs(&[doc, no_source]);
    let twice = filter_to_minimal_docs(&once);

    assert_eq!(once, twice);
    assert_eq!(once[1].metadata["source"], json!(null));
}

#[test]
fn test_short_document_is_one_chunk() {
    let doc = Document::new("  A short page of text.\n");

    let chunks = split_documents(&[doc], 500, 50).unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].page_content, "A short page of text.");
}

#[test]
fn test_long_document_chunks_overlap() {
    let doc = Document::new(page_text(7));

    let chunks = split_documents(&[doc], 500, 50).unwrap();

    assert!(chunks.len() >= 2);
    for pair in chunks.windows(2) {
        let carried = pair[1].page_content.lines().next().unwrap();
        assert!(pair[0].page_content.ends_with(carried));
    }
}

#[test]
fn test_invalid_sizes_are_chunking_errors() {
    let err = split_documents(&[Document::new("text")], 10, 20).unwrap_err();
    assert!(matches!(err, Error::Chunking(_)));
}

#[tokio::test]
async fn test_configured_pipeline() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    write_pdf(&dir.path().join("nested").join("deep.pdf"), &[page_text(1)]);

    let config = Config::from_toml_str(
        r#"
        [loader]
        recursive = true

        [splitter]
        chunk_size = 200
        chunk_overlap = 20
        add_start_index = true
        "#,
    )
    .unwrap();

    let docs = ragprep::DocumentLoader::load(&config.directory_loader(dir.path()))
        .await
        .unwrap();
    assert_eq!(docs.len(), 1);

    let splitter =
        ragprep::RecursiveCharacterTextSplitter::new(config.splitter.clone().into()).unwrap();
    let chunks = splitter.split_documents(&filter_to_minimal_docs(&docs)).unwrap();

    assert!(chunks.len() >= 5);
    for chunk in &chunks {
        assert!(chunk.page_content.chars().count() <= 200);
        assert!(chunk.metadata["start_index"].is_u64());
    }
}

#[tokio::test]
async fn test_mock_embeddings_are_deterministic() {
    let first = MockEmbedder::new(TEST_DIM);
    let second = MockEmbedder::new(TEST_DIM);
    let texts = ["alpha chunk", "beta chunk"];

    let a = first.embed_documents(&texts).await.unwrap();
    let b = second.embed_documents(&texts).await.unwrap();

    assert_eq!(a, b);
    assert_ne!(a[0], a[1]);
}
