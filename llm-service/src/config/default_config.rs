//! Environment-driven constructors for the two standard profiles.
//!
//! All required configuration is validated eagerly so that a missing variable
//! fails startup instead of the first model call.
//!
//! # Env
//! - `LLM_PROVIDER`   — `ollama` (default) or `openai`
//! - `LLM_ENDPOINT`   — inference endpoint; defaults per provider
//! - `LLM_API_KEY`    — generative-model API key (required for OpenAI-compatible)
//! - `GENERATION_MODEL` — generative model identifier (required)
//! - `EMBEDDING_MODEL`  — embedding model identifier (required)
//! - `LLM_MAX_TOKENS`   — optional generation cap

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{
    ConfigError, Result, env_opt, env_opt_u32, must_env, validate_http_endpoint,
};

/// Default endpoint for a local Ollama runtime.
const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";
/// Default endpoint for the OpenAI API.
const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";

/// Resolves the provider from `LLM_PROVIDER`.
///
/// # Errors
/// Returns [`ConfigError::UnsupportedProvider`] for unknown values.
fn provider_from_env() -> Result<LlmProvider> {
    match env_opt("LLM_PROVIDER").as_deref() {
        None => Ok(LlmProvider::Ollama),
        Some("ollama") => Ok(LlmProvider::Ollama),
        Some("openai") => Ok(LlmProvider::OpenAi),
        Some(other) => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
    }
}

/// Resolves the endpoint for the given provider, honoring `LLM_ENDPOINT`.
fn endpoint_for(provider: LlmProvider) -> Result<String> {
    let endpoint = env_opt("LLM_ENDPOINT").unwrap_or_else(|| {
        match provider {
            LlmProvider::Ollama => DEFAULT_OLLAMA_ENDPOINT,
            LlmProvider::OpenAi => DEFAULT_OPENAI_ENDPOINT,
        }
        .to_string()
    });
    validate_http_endpoint("LLM_ENDPOINT", &endpoint)?;
    Ok(endpoint)
}

/// Constructs the **generation** profile config from env.
///
/// Defaults: low temperature (grounded answering, not creative writing) and a
/// generous timeout, since answer synthesis over large contexts can be slow.
///
/// # Errors
/// Returns config errors for missing/invalid variables.
pub fn config_generation() -> Result<LlmModelConfig> {
    let provider = provider_from_env()?;
    let endpoint = endpoint_for(provider)?;
    let model = must_env("GENERATION_MODEL")?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key: env_opt("LLM_API_KEY"),
        max_tokens,
        temperature: Some(0.2),
        top_p: Some(0.9),
        timeout_secs: Some(600),
    })
}

/// Constructs the **embedding** profile config from env.
///
/// Defaults: `temperature = Some(0.0)` (embeddings must be deterministic) and
/// a short timeout.
///
/// # Errors
/// Returns config errors for missing/invalid variables.
pub fn config_embedding() -> Result<LlmModelConfig> {
    let provider = provider_from_env()?;
    let endpoint = endpoint_for(provider)?;
    let model = must_env("EMBEDDING_MODEL")?;

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key: env_opt("LLM_API_KEY"),
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(60),
    })
}
