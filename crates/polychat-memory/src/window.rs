use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One completed conversation turn: the user's text and the assistant's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

impl Exchange {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// Bounded FIFO of the most recent exchanges, rendered on demand into the
/// history block of a persona prompt.
///
/// `Clone` shares the underlying window: a chain holding a clone observes
/// every `record` and `clear` performed through the session's handle.
pub struct WindowMemory {
    exchanges: Arc<RwLock<VecDeque<Exchange>>>,
    capacity: usize,
    speaker: String,
}

pub const DEFAULT_SPEAKER: &str = "Assistant";

impl WindowMemory {
    /// A window retaining at most `capacity` exchanges, labeled with the
    /// default "Assistant" speaker tag.
    pub fn new(capacity: usize) -> Self {
        Self::with_speaker(capacity, DEFAULT_SPEAKER)
    }

    /// A window whose rendered assistant lines carry the given speaker tag.
    pub fn with_speaker(capacity: usize, speaker: impl Into<String>) -> Self {
        Self {
            exchanges: Arc::new(RwLock::new(VecDeque::new())),
            capacity,
            speaker: speaker.into(),
        }
    }

    /// Append one exchange, evicting the oldest while over capacity.
    ///
    /// A zero-capacity window retains nothing: single-turn mode.
    pub fn record(&self, user: impl Into<String>, assistant: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        let mut exchanges = self.exchanges.write();
        exchanges.push_back(Exchange::new(user, assistant));
        while exchanges.len() > self.capacity {
            let evicted = exchanges.pop_front();
            if let Some(ex) = evicted {
                debug!(user_len = ex.user.len(), "Evicted oldest exchange");
            }
        }
    }

    /// Render the retained exchanges in chronological order as alternating
    /// `Human:` / `<speaker>:` lines. Pure; an empty window renders "".
    pub fn render(&self) -> String {
        let exchanges = self.exchanges.read();
        let mut lines = Vec::with_capacity(exchanges.len() * 2);
        for exchange in exchanges.iter() {
            lines.push(format!("Human: {}", exchange.user));
            lines.push(format!("{}: {}", self.speaker, exchange.assistant));
        }
        lines.join("\n")
    }

    pub fn clear(&self) {
        self.exchanges.write().clear();
    }

    /// Number of retained exchanges.
    pub fn len(&self) -> usize {
        self.exchanges.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configured bound, in exchanges.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    /// Snapshot of the retained exchanges, oldest first.
    pub fn exchanges(&self) -> Vec<Exchange> {
        self.exchanges.read().iter().cloned().collect()
    }
}

impl Clone for WindowMemory {
    fn clone(&self) -> Self {
        Self {
            exchanges: Arc::clone(&self.exchanges),
            capacity: self.capacity,
            speaker: self.speaker.clone(),
        }
    }
}

impl std::fmt::Debug for WindowMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowMemory")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("speaker", &self.speaker)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_render_in_order() {
        let memory = WindowMemory::new(10);
        memory.record("Hello", "Hi there!");
        memory.record("How are you?", "Great!");

        assert_eq!(memory.len(), 2);
        assert_eq!(
            memory.render(),
            "Human: Hello\nAssistant: Hi there!\nHuman: How are you?\nAssistant: Great!"
        );
    }

    #[test]
    fn test_capacity_evicts_oldest_first() {
        let memory = WindowMemory::new(3);
        for i in 0..5 {
            memory.record(format!("q{}", i), format!("a{}", i));
        }

        assert_eq!(memory.len(), 3);
        let exchanges = memory.exchanges();
        assert_eq!(exchanges[0].user, "q2");
        assert_eq!(exchanges[1].user, "q3");
        assert_eq!(exchanges[2].user, "q4");
    }

    #[test]
    fn test_eleven_exchanges_keep_last_ten() {
        let memory = WindowMemory::new(10);
        for i in 1..=11 {
            memory.record(format!("question {}", i), format!("answer {}", i));
        }

        assert_eq!(memory.len(), 10);
        let rendered = memory.render();
        assert!(!rendered.contains("question 1\n"));
        assert!(rendered.starts_with("Human: question 2"));
        assert!(rendered.contains("question 11"));
        assert!(rendered.ends_with("Assistant: answer 11"));
    }

    #[test]
    fn test_empty_window_renders_empty_string() {
        let memory = WindowMemory::new(10);
        assert_eq!(memory.render(), "");
        assert!(memory.is_empty());
    }

    #[test]
    fn test_clear_empties_regardless_of_prior_state() {
        let memory = WindowMemory::new(10);
        memory.record("a", "b");
        memory.record("c", "d");
        memory.clear();

        assert_eq!(memory.len(), 0);
        assert_eq!(memory.render(), "");
    }

    #[test]
    fn test_zero_capacity_is_stateless() {
        let memory = WindowMemory::new(0);
        memory.record("Hello", "Hi!");
        memory.record("Still there?", "Yes!");

        assert_eq!(memory.len(), 0);
        assert_eq!(memory.render(), "");
    }

    #[test]
    fn test_speaker_tag_in_rendered_lines() {
        let memory = WindowMemory::with_speaker(10, "RoastBot");
        memory.record("Roast me", "Gladly.");

        assert_eq!(memory.render(), "Human: Roast me\nRoastBot: Gladly.");
        assert_eq!(memory.speaker(), "RoastBot");
    }

    #[test]
    fn test_clone_shares_state() {
        let memory = WindowMemory::new(10);
        let handle = memory.clone();

        memory.record("from original", "seen by clone");
        assert_eq!(handle.len(), 1);

        handle.clear();
        assert!(memory.is_empty());
    }

    #[test]
    fn test_render_is_idempotent() {
        let memory = WindowMemory::new(10);
        memory.record("one", "two");

        let first = memory.render();
        let second = memory.render();
        assert_eq!(first, second);
        assert_eq!(memory.len(), 1);
    }
}
