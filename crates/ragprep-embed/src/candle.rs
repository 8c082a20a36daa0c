//! Sentence-transformer embedder using Candle.
//!
//! Loads any BERT-family model from the Hugging Face Hub:
//! - `tokenizer.json`, `config.json`
//! - `model.safetensors`, or `pytorch_model.bin` when no safetensors exist
//!
//! Embeddings are the attention-masked mean of the last hidden state,
//! optionally L2-normalized.

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::api::tokio::{ApiBuilder, ApiRepo};
use hf_hub::{Repo, RepoType};
use ragprep_core::{EmbedError, Embedder, EmbeddingConfig, EmbeddingOutput};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tokenizers::{Tokenizer, TruncationParams};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::factory::EmbeddingOptions;

/// Shape information read from `config.json`.
///
/// Candle's BERT config keeps these fields private.
#[derive(Debug, Clone, Copy, Deserialize)]
struct ModelDims {
    hidden_size: usize,
    #[serde(default = "default_max_positions")]
    max_position_embeddings: usize,
}

fn default_max_positions() -> usize {
    512
}

/// BERT sentence embedder using Candle.
pub struct CandleEmbedder {
    model_id: String,
    revision: Option<String>,
    cache_dir: Option<PathBuf>,
    /// Device to run inference on (CPU or CUDA)
    device: Device,
    model: Arc<RwLock<Option<BertModel>>>,
    tokenizer: Arc<RwLock<Option<Tokenizer>>>,
    /// Set once the model is loaded
    dims: OnceLock<ModelDims>,
    init_lock: Mutex<()>,
}

impl CandleEmbedder {
    /// Create an embedder for `options.model`. Nothing is downloaded until
    /// [`init`](Self::init) or the first embedding call.
    pub fn new(options: EmbeddingOptions) -> Self {
        let device = if options.use_gpu {
            Device::cuda_if_available(0).unwrap_or(Device::Cpu)
        } else {
            Device::Cpu
        };
        info!("CandleEmbedder using device: {:?}", device);
        Self::with_device(options, device)
    }

    /// Create with a specific device.
    pub fn with_device(options: EmbeddingOptions, device: Device) -> Self {
        Self {
            model_id: options.model,
            revision: options.revision,
            cache_dir: options.cache_dir,
            device,
            model: Arc::new(RwLock::new(None)),
            tokenizer: Arc::new(RwLock::new(None)),
            dims: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    /// Whether the model has been loaded.
    pub fn is_initialized(&self) -> bool {
        self.dims.get().is_some()
    }

    /// Revision requested for the model, if any.
    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    /// Initialize the model (download if needed, load into memory).
    pub async fn init(&self) -> Result<(), EmbedError> {
        let _guard = self.init_lock.lock().await;
        if self.is_initialized() {
            return Ok(());
        }

        if self.model_id.trim().is_empty() {
            return Err(EmbedError::ModelLoad("model name is empty".to_string()));
        }

        info!("Initializing CandleEmbedder with model: {}", self.model_id);

        let mut builder = ApiBuilder::new().with_progress(false);
        if let Some(cache_dir) = &self.cache_dir {
            builder = builder.with_cache_dir(cache_dir.clone());
        }
        let api = builder
            .build()
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to create HF API: {e}")))?;

        let repo = match &self.revision {
            Some(revision) => Repo::with_revision(
                self.model_id.clone(),
                RepoType::Model,
                revision.clone(),
            ),
            None => Repo::new(self.model_id.clone(), RepoType::Model),
        };
        let repo = api.repo(repo);

        debug!("Downloading tokenizer...");
        let tokenizer_path = repo
            .get("tokenizer.json")
            .await
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to download tokenizer: {e}")))?;

        debug!("Downloading config...");
        let config_path = repo
            .get("config.json")
            .await
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to download config: {e}")))?;

        let weights_path = download_weights(&repo).await?;

        debug!("Loading config...");
        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to read config: {e}")))?;
        let config: Config = serde_json::from_str(&config_str)
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to parse config: {e}")))?;
        let dims: ModelDims = serde_json::from_str(&config_str)
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to parse config: {e}")))?;

        debug!("Loading tokenizer...");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to load tokenizer: {e}")))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: dims.max_position_embeddings,
                ..Default::default()
            }))
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to configure tokenizer: {e}")))?;

        debug!("Loading model weights from {:?}", weights_path);
        let vb = self.var_builder(&weights_path)?;
        let model = BertModel::load(vb, &config)
            .map_err(|e| EmbedError::ModelLoad(format!("Failed to create BERT model: {e}")))?;

        *self.tokenizer.write().await = Some(tokenizer);
        *self.model.write().await = Some(model);
        // Only set under init_lock, after the model is in place.
        let _ = self.dims.set(dims);

        info!(
            "CandleEmbedder initialized: {} ({} dimensions, {} max tokens)",
            self.model_id, dims.hidden_size, dims.max_position_embeddings
        );
        Ok(())
    }

    fn var_builder(&self, weights_path: &Path) -> Result<VarBuilder<'static>, EmbedError> {
        let is_safetensors = weights_path
            .extension()
            .is_some_and(|ext| ext == "safetensors");

        if is_safetensors {
            // SAFETY: the file comes from the hub cache and is only read.
            #[allow(unsafe_code)]
            let vb = unsafe {
                VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &self.device)
            };
            vb.map_err(|e| EmbedError::ModelLoad(format!("Failed to load weights: {e}")))
        } else {
            VarBuilder::from_pth(weights_path, DType::F32, &self.device)
                .map_err(|e| EmbedError::ModelLoad(format!("Failed to load weights: {e}")))
        }
    }

    /// Mean pooling with attention mask.
    fn mean_pooling(
        &self,
        token_embeddings: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor, EmbedError> {
        let mask = attention_mask
            .unsqueeze(2)
            .map_err(|e| EmbedError::Inference(format!("unsqueeze failed: {e}")))?
            .broadcast_as(token_embeddings.shape())
            .map_err(|e| EmbedError::Inference(format!("broadcast failed: {e}")))?
            .to_dtype(DType::F32)
            .map_err(|e| EmbedError::Inference(format!("dtype conversion failed: {e}")))?;

        let sum = token_embeddings
            .mul(&mask)
            .map_err(|e| EmbedError::Inference(format!("mul failed: {e}")))?
            .sum(1)
            .map_err(|e| EmbedError::Inference(format!("sum failed: {e}")))?;

        let mask_sum = mask
            .sum(1)
            .map_err(|e| EmbedError::Inference(format!("mask sum failed: {e}")))?
            .clamp(1e-9, f64::MAX)
            .map_err(|e| EmbedError::Inference(format!("clamp failed: {e}")))?;

        sum.div(&mask_sum)
            .map_err(|e| EmbedError::Inference(format!("div failed: {e}")))
    }

    /// L2 normalize embeddings.
    fn normalize(&self, embeddings: &Tensor) -> Result<Tensor, EmbedError> {
        let norm = embeddings
            .sqr()
            .map_err(|e| EmbedError::Inference(format!("sqr failed: {e}")))?
            .sum_keepdim(1)
            .map_err(|e| EmbedError::Inference(format!("sum_keepdim failed: {e}")))?
            .sqrt()
            .map_err(|e| EmbedError::Inference(format!("sqrt failed: {e}")))?
            .clamp(1e-12, f64::MAX)
            .map_err(|e| EmbedError::Inference(format!("clamp failed: {e}")))?;

        embeddings
            .broadcast_div(&norm)
            .map_err(|e| EmbedError::Inference(format!("div failed: {e}")))
    }

    /// Encode a batch of texts.
    async fn encode_batch(
        &self,
        texts: &[&str],
        normalize: bool,
    ) -> Result<Vec<EmbeddingOutput>, EmbedError> {
        self.init().await?;

        let tokenizer = self.tokenizer.read().await;
        let tokenizer = tokenizer
            .as_ref()
            .ok_or_else(|| EmbedError::NotInitialized(self.model_id.clone()))?;

        let model = self.model.read().await;
        let model = model
            .as_ref()
            .ok_or_else(|| EmbedError::NotInitialized(self.model_id.clone()))?;

        // Truncation to the model's limit is configured on the tokenizer.
        let encodings = tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbedError::Inference(format!("Tokenization failed: {e}")))?;

        let max_len = encodings.iter().map(|e| e.len()).max().unwrap_or(0);
        let batch_size = texts.len();

        let mut input_ids_vec: Vec<u32> = Vec::with_capacity(batch_size * max_len);
        let mut attention_mask_vec: Vec<u32> = Vec::with_capacity(batch_size * max_len);
        let mut token_counts = Vec::with_capacity(batch_size);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            token_counts.push(ids.len());
            for i in 0..max_len {
                match ids.get(i) {
                    Some(&id) => {
                        input_ids_vec.push(id);
                        attention_mask_vec.push(1);
                    }
                    None => {
                        input_ids_vec.push(0); // PAD token
                        attention_mask_vec.push(0);
                    }
                }
            }
        }
        let token_type_ids_vec = vec![0u32; batch_size * max_len];

        let input_ids = Tensor::from_vec(input_ids_vec, (batch_size, max_len), &self.device)
            .map_err(|e| EmbedError::Inference(format!("Failed to create input_ids tensor: {e}")))?;
        let attention_mask =
            Tensor::from_vec(attention_mask_vec, (batch_size, max_len), &self.device).map_err(
                |e| EmbedError::Inference(format!("Failed to create attention_mask tensor: {e}")),
            )?;
        let token_type_ids =
            Tensor::from_vec(token_type_ids_vec, (batch_size, max_len), &self.device).map_err(
                |e| EmbedError::Inference(format!("Failed to create token_type_ids tensor: {e}")),
            )?;

        let output = model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| EmbedError::Inference(format!("Model forward failed: {e}")))?;

        let pooled = self.mean_pooling(&output, &attention_mask)?;
        let embeddings = if normalize {
            self.normalize(&pooled)?
        } else {
            pooled
        };

        let mut results = Vec::with_capacity(batch_size);
        for (i, token_count) in token_counts.into_iter().enumerate() {
            let embedding = embeddings
                .get(i)
                .map_err(|e| EmbedError::Inference(format!("Failed to get embedding {i}: {e}")))?
                .to_vec1::<f32>()
                .map_err(|e| EmbedError::Inference(format!("Failed to convert to vec: {e}")))?;
            results.push(EmbeddingOutput {
                embedding,
                token_count,
            });
        }

        Ok(results)
    }
}

/// Fetch the weights, preferring safetensors.
async fn download_weights(repo: &ApiRepo) -> Result<PathBuf, EmbedError> {
    debug!("Downloading model weights...");
    match repo.get("model.safetensors").await {
        Ok(path) => Ok(path),
        Err(safetensors_err) => {
            debug!(
                "model.safetensors unavailable ({}), trying pytorch_model.bin",
                safetensors_err
            );
            repo.get("pytorch_model.bin").await.map_err(|e| {
                EmbedError::ModelLoad(format!(
                    "Failed to download weights: {safetensors_err}; {e}"
                ))
            })
        }
    }
}

#[async_trait]
impl Embedder for CandleEmbedder {
    fn model_name(&self) -> &str {
        &self.model_id
    }

    /// Hidden size of the loaded model; 0 before initialization.
    fn dimension(&self) -> usize {
        self.dims.get().map_or(0, |d| d.hidden_size)
    }

    /// Position limit of the loaded model; 0 before initialization.
    fn max_tokens(&self) -> usize {
        self.dims.get().map_or(0, |d| d.max_position_embeddings)
    }

    async fn embed_text(
        &self,
        texts: &[&str],
        config: &EmbeddingConfig,
    ) -> Result<Vec<EmbeddingOutput>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            "Embedding {} texts with batch_size {}",
            texts.len(),
            config.batch_size
        );

        let mut all_results = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(config.batch_size.max(1)) {
            all_results.extend(self.encode_batch(chunk, config.normalize).await?);
        }

        Ok(all_results)
    }
}
