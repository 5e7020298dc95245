//! Shared LLM service with two active profiles: `generation` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents. The
//!   embedding profile in particular must be a process-wide singleton: one
//!   expensive client shared by every caller, read-only after construction.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout).
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use llm_service::LlmProfiles;
//! use llm_service::config::default_config::{config_embedding, config_generation};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let svc = Arc::new(LlmProfiles::new(config_generation()?, config_embedding()?)?);
//!
//!     let txt = svc.generate("Hello world", None).await?;
//!     println!("{}", txt);
//!
//!     let emb = svc.embed("Ferris").await?;
//!     println!("Embedding dim = {}", emb.len());
//!     Ok(())
//! }
//! ```

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::Arc,
};

use tokio::sync::RwLock;

use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::{LlmError, Result};
use crate::services::{ollama_service::OllamaService, openai_service::OpenAiService};

/// Shared service that manages the **generation** and **embedding** profiles.
///
/// Internally caches Ollama/OpenAI clients keyed by their configuration to
/// avoid recreating HTTP clients on each call.
pub struct LlmProfiles {
    generation: LlmModelConfig,
    embedding: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,
}

impl LlmProfiles {
    /// Creates a new service with the two profiles.
    pub fn new(generation: LlmModelConfig, embedding: LlmModelConfig) -> Result<Self> {
        Ok(Self {
            generation,
            embedding,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
        })
    }

    /// Generates text using the **generation** profile.
    ///
    /// # Arguments
    /// - `prompt`: input text prompt.
    /// - `system`: optional system instruction (chat-style providers only).
    ///
    /// # Errors
    /// Returns [`LlmError`] if generation fails. No retries are performed.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        match self.generation.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.generation).await?;
                cli.generate(prompt).await
            }
            LlmProvider::OpenAi => {
                let cli = self.get_or_init_openai(&self.generation).await?;
                cli.generate(prompt, system).await
            }
        }
    }

    /// Computes a single embedding using the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`LlmError`] if embedding fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        let mut out = self.embed_batch(std::slice::from_ref(&input.to_string())).await?;
        out.pop().ok_or(LlmError::Decode {
            provider: "profiles",
            message: "provider returned no embedding".to_string(),
        })
    }

    /// Computes embeddings for a batch of inputs using the **embedding**
    /// profile. Returns one vector per input, in input order.
    ///
    /// # Errors
    /// Returns [`LlmError`] if embedding fails.
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        match self.embedding.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.embedding).await?;
                cli.embeddings(inputs).await
            }
            LlmProvider::OpenAi => {
                let cli = self.get_or_init_openai(&self.embedding).await?;
                cli.embeddings(inputs).await
            }
        }
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init_ollama(&self, cfg: &LlmModelConfig) -> Result<Arc<OllamaService>> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }

    async fn get_or_init_openai(&self, cfg: &LlmModelConfig) -> Result<Arc<OpenAiService>> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, Eq)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

impl PartialEq for ClientKey {
    fn eq(&self, other: &Self) -> bool {
        self.provider == other.provider
            && self.endpoint == other.endpoint
            && self.model == other.model
            && self.api_key == other.api_key
            && self.timeout == other.timeout
    }
}

impl Hash for ClientKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provider.hash(state);
        self.endpoint.hash(state);
        self.model.hash(state);
        if let Some(ref k) = self.api_key {
            k.hash(state);
        } else {
            0usize.hash(state);
        }
        self.timeout.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: model.to_string(),
            endpoint: "http://localhost:11434".to_string(),
            api_key: None,
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn client_cache_reuses_instances() {
        let svc = LlmProfiles::new(cfg("gen"), cfg("embed")).unwrap();
        let a = svc.get_or_init_ollama(&cfg("embed")).await.unwrap();
        let b = svc.get_or_init_ollama(&cfg("embed")).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        let c = svc.get_or_init_ollama(&cfg("gen")).await.unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn embed_batch_empty_is_noop() {
        let svc = LlmProfiles::new(cfg("gen"), cfg("embed")).unwrap();
        let out = svc.embed_batch(&[]).await.unwrap();
        assert!(out.is_empty());
    }
}
