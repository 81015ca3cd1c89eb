use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use polychat_core::{BackendError, CompletionBackend, GenerationParams};

/// Scriptable in-memory backend for testing.
///
/// Clones share state through an inner lock, so a test can hold one handle
/// while a session owns another and still inspect recorded calls.
#[derive(Clone)]
pub struct MockBackend {
    inner: Arc<RwLock<MockBackendInner>>,
}

struct MockBackendInner {
    responses: Vec<String>,
    response_index: usize,
    cycle_responses: bool,
    calls: Vec<MockCall>,
    failure: Option<BackendError>,
    latency_ms: u64,
}

/// One recorded `complete` invocation.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub prompt: String,
    pub params: GenerationParams,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockBackendInner {
                responses: Vec::new(),
                response_index: 0,
                cycle_responses: false,
                calls: Vec::new(),
                failure: None,
                latency_ms: 0,
            })),
        }
    }

    /// Scripts a single response returned for every call.
    pub fn set_response(&mut self, response: impl Into<String>) {
        let mut inner = self.inner.write();
        inner.responses = vec![response.into()];
        inner.response_index = 0;
        inner.cycle_responses = false;
    }

    /// Scripts a sequence of responses. With `cycle` the sequence wraps
    /// around; otherwise the last response repeats.
    pub fn set_responses(&mut self, responses: Vec<String>, cycle: bool) {
        let mut inner = self.inner.write();
        inner.responses = responses;
        inner.response_index = 0;
        inner.cycle_responses = cycle;
    }

    /// Makes every subsequent call fail with the given error.
    pub fn set_failure(&mut self, failure: BackendError) {
        self.inner.write().failure = Some(failure);
    }

    /// Shorthand for an opaque failure with the given message.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.set_failure(BackendError::Other(message.into()));
    }

    pub fn clear_failure(&mut self) {
        self.inner.write().failure = None;
    }

    pub fn set_latency(&mut self, latency_ms: u64) {
        self.inner.write().latency_ms = latency_ms;
    }

    pub fn call_count(&self) -> usize {
        self.inner.read().calls.len()
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.inner.read().calls.clone()
    }

    pub fn last_call(&self) -> Option<MockCall> {
        self.inner.read().calls.last().cloned()
    }

    /// The prompt of the most recent call.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_call().map(|c| c.prompt)
    }

    pub fn clear_calls(&mut self) {
        self.inner.write().calls.clear();
    }

    pub fn reset(&mut self) {
        let mut inner = self.inner.write();
        inner.responses.clear();
        inner.response_index = 0;
        inner.cycle_responses = false;
        inner.calls.clear();
        inner.failure = None;
        inner.latency_ms = 0;
    }

    fn next_response(&self) -> String {
        let mut inner = self.inner.write();
        if inner.responses.is_empty() {
            return "Mock response".to_string();
        }

        let response = inner.responses[inner.response_index].clone();
        if inner.cycle_responses {
            inner.response_index = (inner.response_index + 1) % inner.responses.len();
        } else if inner.response_index < inner.responses.len() - 1 {
            inner.response_index += 1;
        }
        response
    }

    async fn simulate_latency(&self) {
        let latency_ms = self.inner.read().latency_ms;
        if latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(latency_ms)).await;
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, BackendError> {
        {
            let mut inner = self.inner.write();
            inner.calls.push(MockCall {
                prompt: prompt.to_string(),
                params: params.clone(),
            });
        }
        self.simulate_latency().await;

        if let Some(failure) = self.inner.read().failure.clone() {
            return Err(failure);
        }

        Ok(self.next_response())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GenerationParams {
        GenerationParams::default()
    }

    #[tokio::test]
    async fn test_scripted_response() {
        let mut mock = MockBackend::new();
        mock.set_response("hello there");

        let out = mock.complete("prompt", &params()).await.unwrap();
        assert_eq!(out, "hello there");
    }

    #[tokio::test]
    async fn test_sequence_sticks_at_last() {
        let mut mock = MockBackend::new();
        mock.set_responses(vec!["first".into(), "second".into()], false);

        assert_eq!(mock.complete("p", &params()).await.unwrap(), "first");
        assert_eq!(mock.complete("p", &params()).await.unwrap(), "second");
        assert_eq!(mock.complete("p", &params()).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_cycling_responses() {
        let mut mock = MockBackend::new();
        mock.set_responses(vec!["a".into(), "b".into()], true);

        assert_eq!(mock.complete("p", &params()).await.unwrap(), "a");
        assert_eq!(mock.complete("p", &params()).await.unwrap(), "b");
        assert_eq!(mock.complete("p", &params()).await.unwrap(), "a");
    }

    #[tokio::test]
    async fn test_failure_injection_and_clear() {
        let mut mock = MockBackend::new();
        mock.set_failure(BackendError::RateLimit);

        let err = mock.complete("p", &params()).await.unwrap_err();
        assert!(matches!(err, BackendError::RateLimit));

        mock.clear_failure();
        assert!(mock.complete("p", &params()).await.is_ok());
    }

    #[tokio::test]
    async fn test_records_prompt_and_params() {
        let mut mock = MockBackend::new();
        mock.set_response("ok");

        let custom = GenerationParams::default().with_model("mixtral-8x7b-32768");
        mock.complete("the rendered prompt", &custom).await.unwrap();

        assert_eq!(mock.call_count(), 1);
        let call = mock.last_call().unwrap();
        assert_eq!(call.prompt, "the rendered prompt");
        assert_eq!(call.params.model, "mixtral-8x7b-32768");
        assert_eq!(mock.last_prompt().unwrap(), "the rendered prompt");
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mut mock = MockBackend::new();
        mock.set_response("shared");
        let observer = mock.clone();

        mock.complete("p", &params()).await.unwrap();
        assert_eq!(observer.call_count(), 1);
    }

    #[tokio::test]
    async fn test_reset() {
        let mut mock = MockBackend::new();
        mock.set_response("x");
        mock.set_error("boom");
        mock.complete("p", &params()).await.unwrap_err();

        mock.reset();
        assert_eq!(mock.call_count(), 0);
        assert_eq!(mock.complete("p", &params()).await.unwrap(), "Mock response");
    }
}
