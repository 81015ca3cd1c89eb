//! Completion backend trait

use async_trait::async_trait;

use crate::error::BackendError;
use crate::types::GenerationParams;

/// An opaque inference backend: one rendered prompt in, one completion out.
///
/// Implementations must not retain conversation state of their own; history
/// is already folded into the prompt by the chain.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, BackendError>;

    /// Short identifier used in logs and diagnostics (e.g. "groq", "mock").
    fn name(&self) -> &str;
}
