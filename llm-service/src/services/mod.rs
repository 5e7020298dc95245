pub mod ollama_service;
pub mod openai_service;
