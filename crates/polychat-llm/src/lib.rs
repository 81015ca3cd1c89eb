//! Completion backends.
//!
//! [`UnifiedBackend`] speaks to hosted providers (Groq by default) through
//! the `llm` crate; [`MockBackend`] is a scriptable stand-in for tests.
//! Both implement [`polychat_core::CompletionBackend`].

mod mock;
mod provider;

pub use mock::{MockBackend, MockCall};
pub use provider::{ProviderKind, UnifiedBackend};
