//! Shared helpers for integration tests.

use async_trait::async_trait;
use ragprep::{EmbedError, Embedder, EmbeddingConfig, EmbeddingOutput};
use ragprep_extract::fixtures::PdfFixture;
use std::path::Path;

/// Write a PDF with one page per entry; `\n` starts a new text line.
pub fn write_pdf(path: &Path, pages: &[String]) {
    let pages: Vec<&str> = pages.iter().map(String::as_str).collect();
    ragprep_extract::fixtures::write_pdf(path, &PdfFixture::new(&pages));
}

/// About 1000 characters of prose over 20 lines.
pub fn page_text(page: usize) -> String {
    (0..20)
        .map(|line| format!("Page {page} line {line:02} covers retrieval and its overlap."))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Mock embedder for testing (avoids model download).
pub struct MockEmbedder {
    dimension: usize,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    fn model_name(&self) -> &str {
        "mock-embedder"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn max_tokens(&self) -> usize {
        512
    }

    async fn embed_text(
        &self,
        texts: &[&str],
        _config: &EmbeddingConfig,
    ) -> Result<Vec<EmbeddingOutput>, EmbedError> {
        // Deterministic embeddings based on text content
        Ok(texts
            .iter()
            .map(|text| {
                let hash = blake3::hash(text.as_bytes());
                let bytes = hash.as_bytes();
                let embedding: Vec<f32> = (0..self.dimension)
                    .map(|i| (f32::from(bytes[i % 32]) / 255.0) - 0.5)
                    .collect();
                EmbeddingOutput {
                    embedding,
                    token_count: text.split_whitespace().count(),
                }
            })
            .collect())
    }
}
