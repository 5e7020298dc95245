//! Grounded answer synthesis.
//!
//! Builds a constrained prompt from the retrieved context and the user
//! question, then calls the generation profile. The prompt instructs the
//! model to answer strictly from the supplied context and to emit a fixed
//! fallback sentence when the context does not cover the question, so
//! callers can detect an uninformative answer by exact string match.

use llm_service::{LlmError, LlmProfiles};
use tracing::debug;

/// Exact fallback sentence the model is instructed to emit when the
/// retrieved context does not answer the question.
pub const FALLBACK_ANSWER: &str =
    "No information found in documentation. Please check the official docs.";

const SYSTEM_PROMPT: &str = "You are a documentation assistant. You answer strictly from the \
documentation excerpts provided to you and never from outside knowledge.";

fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "Answer the question using ONLY the documentation excerpts below.\n\
         \n\
         STRICT RULES:\n\
         1. Use only facts present in the excerpts. Do not add outside knowledge.\n\
         2. When the excerpts contain code relevant to the question, reproduce it \
         verbatim; never invent code examples that are not in the excerpts.\n\
         3. If the excerpts do not contain the answer, reply with exactly this \
         sentence and nothing else: {FALLBACK_ANSWER}\n\
         4. Be concise and technical. Do not speculate.\n\
         \n\
         Documentation excerpts:\n\
         {context}\n\
         \n\
         Question: {question}"
    )
}

/// Synthesizes an answer for `question` grounded in `context_chunks`.
///
/// Chunks are joined with blank lines in retrieval order; ranking is the
/// retriever's concern, not the prompt's. The model's response is returned
/// unmodified.
///
/// # Errors
/// Propagates generation failures; no retry is attempted here.
pub async fn synthesize(
    svc: &LlmProfiles,
    question: &str,
    context_chunks: &[String],
) -> Result<String, LlmError> {
    let context = context_chunks.join("\n\n");
    debug!(
        chunks = context_chunks.len(),
        context_chars = context.chars().count(),
        "synthesizing answer"
    );
    let prompt = build_prompt(question, &context);
    svc.generate(&prompt, Some(SYSTEM_PROMPT)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_question_and_context() {
        let prompt = build_prompt("how do I configure retries?", "Retries are set in config.");
        assert!(prompt.contains("how do I configure retries?"));
        assert!(prompt.contains("Retries are set in config."));
    }

    #[test]
    fn prompt_mandates_exact_fallback() {
        let prompt = build_prompt("q", "ctx");
        assert!(prompt.contains(FALLBACK_ANSWER));
        assert!(prompt.contains("exactly this"));
    }
}
