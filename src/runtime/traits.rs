//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the engine with mock implementations.

use crate::llm::{LlmError, LlmRequest, LlmService};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on generated answer length
const MAX_ANSWER_TOKENS: u32 = 512;

/// Text generation service: prompt in, text out
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).generate(prompt).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter from an `LlmService` with a bounded timeout on every call
pub struct LlmTextGenerator {
    service: Arc<dyn LlmService>,
    timeout: Duration,
}

impl LlmTextGenerator {
    pub fn new(service: Arc<dyn LlmService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }
}

#[async_trait]
impl TextGenerator for LlmTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = LlmRequest::prompt(prompt).with_max_tokens(MAX_ANSWER_TOKENS);
        match tokio::time::timeout(self.timeout, self.service.complete(&request)).await {
            Ok(result) => result.map(|response| response.text),
            Err(_) => Err(LlmError::timeout(format!(
                "Generation timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}
