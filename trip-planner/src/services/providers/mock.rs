//! Scripted provider for tests and local runs without an API key.

use super::{
    CompletionProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderError,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock completion provider.
///
/// Replies are served in order; the last one repeats once the script runs
/// out. Every request is recorded for later inspection.
pub struct MockCompletionProvider {
    enabled: bool,
    script: Mutex<VecDeque<Result<Option<String>, ProviderError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletionProvider {
    pub fn new(script: Vec<Result<Option<String>, ProviderError>>) -> Self {
        Self {
            enabled: true,
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(vec![Ok(Some(text.into()))])
    }

    /// Always fail with `err`.
    pub fn failing(err: ProviderError) -> Self {
        Self::new(vec![Err(err)])
    }

    /// A provider that reports itself unhealthy and refuses every call.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(Vec::new())
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn next_reply(&self) -> Result<Option<String>, ProviderError> {
        let mut script = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if script.len() > 1 {
            script.pop_front().unwrap_or(Ok(None))
        } else {
            script.front().cloned().unwrap_or(Ok(None))
        }
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock completion provider not enabled".to_string(),
            ));
        }

        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let text = self.next_reply()?;
        let input_tokens = request
            .messages
            .iter()
            .map(|m| m.content.len() as u32 / 4)
            .sum();

        Ok(CompletionResponse {
            output_tokens: text.as_ref().map_or(0, |t| t.len() as u32 / 4),
            text,
            input_tokens,
            finish_reason: FinishReason::Complete,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock completion provider not enabled".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::ChatMessage;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "mock-model".to_string(),
            messages: vec![ChatMessage::user("plan a trip")],
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn test_script_is_served_in_order_then_repeats() {
        let provider = MockCompletionProvider::new(vec![
            Err(ProviderError::RateLimited),
            Ok(Some("second".to_string())),
        ]);

        assert!(provider.complete(&request()).await.is_err());
        for _ in 0..2 {
            let response = provider.complete(&request()).await.unwrap();
            assert_eq!(response.text.as_deref(), Some("second"));
        }
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_disabled_provider() {
        let provider = MockCompletionProvider::disabled();
        assert!(provider.health_check().await.is_err());
        assert!(provider.complete(&request()).await.is_err());
        assert_eq!(provider.call_count(), 0);
    }
}
