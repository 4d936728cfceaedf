//! OpenAI-compatible chat-completions client.

mod client;
mod error;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use types::{ChatMessage, Choice, CompletionRequest, CompletionResponse};
