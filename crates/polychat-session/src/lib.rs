//! Session orchestration: conversation chain, per-session state and
//! configuration.
//!
//! [`ChatSession`] owns the transcript and the active persona, builds a
//! [`ConversationChain`] lazily for whichever persona is selected, and
//! converts recoverable backend failures into visible transcript entries.

mod chain;
mod config;
mod session;

pub use chain::ConversationChain;
pub use config::{CONFIG_ENV_VAR, ChatConfig};
pub use session::{ChatSession, DEFAULT_WINDOW};
