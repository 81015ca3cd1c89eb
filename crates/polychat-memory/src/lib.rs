//! Conversation memory for polychat: a bounded sliding window of exchanges

mod window;

pub use window::{DEFAULT_SPEAKER, Exchange, WindowMemory};
