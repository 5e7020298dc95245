/// Represents the provider (backend) used for LLM inference and embeddings.
///
/// Adding more providers (e.g. Anthropic, Mistral API) is done by extending
/// this enum and the matching service module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime for on-device inference.
    Ollama,
    /// Any OpenAI-compatible HTTP API (OpenAI itself, or hosted gateways that
    /// expose the `/v1/chat/completions` + `/v1/embeddings` surface).
    OpenAi,
}
