//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// A chat completion endpoint
///
/// This is the core abstraction for talking to a language model. One call,
/// one completion: the caller owns all conversation state and sends the
/// full history with every request. Implementations perform a single
/// attempt; the retry policy lives with the caller.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one completion request and await the full response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
