//! Shared LLM service crate.
//!
//! Exposes two logical profiles — **generation** and **embedding** — behind a
//! single [`profiles::LlmProfiles`] handle. Construct the handle once during
//! startup, wrap it in `Arc`, and pass clones to every component that needs
//! model access; no other LLM client should be created anywhere else in the
//! process.

pub mod config;
pub mod error_handler;
pub mod profiles;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{LlmError, Result};
pub use profiles::LlmProfiles;
