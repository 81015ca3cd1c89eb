use std::fmt;
use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use polychat_core::{ChatError, ChatMessage, CompletionBackend, GenerationParams, Result};
use polychat_memory::WindowMemory;
use polychat_persona::{Persona, PersonaRegistry};

use crate::chain::ConversationChain;

/// Default number of retained exchange pairs.
pub const DEFAULT_WINDOW: usize = 10;

/// One logical chat session: active persona, transcript and conversation
/// chain.
///
/// All state is private to the instance; concurrent sessions are separate
/// instances. Operations take `&mut self`, which makes turns strictly
/// sequential per session.
///
/// The transcript is the append-only display log. It survives persona
/// switches; only [`clear_history`](Self::clear_history) empties it. Prompt
/// memory lives inside the chain and is discarded with it on every switch.
pub struct ChatSession {
    id: Uuid,
    registry: PersonaRegistry,
    backend: Arc<dyn CompletionBackend>,
    params: GenerationParams,
    window: usize,
    persona_id: String,
    transcript: Vec<ChatMessage>,
    chain: Option<ConversationChain>,
}

impl ChatSession {
    /// Creates a session starting on the registry's first persona.
    pub fn new(registry: PersonaRegistry, backend: Arc<dyn CompletionBackend>) -> Self {
        let persona_id = registry.default_persona().id.clone();
        Self {
            id: Uuid::new_v4(),
            registry,
            backend,
            params: GenerationParams::default(),
            window: DEFAULT_WINDOW,
            persona_id,
            transcript: Vec::new(),
            chain: None,
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the number of exchange pairs kept as prompt memory.
    ///
    /// Zero is legal and degenerates to stateless single-turn mode.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// All registered personas, in stable order.
    pub fn personas(&self) -> &[Persona] {
        self.registry.personas()
    }

    /// The active persona.
    pub fn current_persona(&self) -> &Persona {
        // persona_id is validated at construction and on every switch.
        self.registry
            .personas()
            .iter()
            .find(|p| p.id == self.persona_id)
            .unwrap_or_else(|| self.registry.default_persona())
    }

    /// Switches to another persona.
    ///
    /// The chain and its memory window are discarded; the new persona
    /// starts with empty context. The transcript is preserved. Switching
    /// to the already-active persona is a no-op and keeps memory intact.
    /// An unknown id fails and leaves the session unchanged.
    pub fn switch_persona(&mut self, id: &str) -> Result<()> {
        if id == self.persona_id {
            return Ok(());
        }
        self.registry.get(id)?;

        info!(
            session = %self.id,
            from = %self.persona_id,
            to = %id,
            "persona switched, chain and memory discarded"
        );
        self.persona_id = id.to_string();
        self.chain = None;
        Ok(())
    }

    /// Empties the transcript and the memory window.
    ///
    /// The chain is retained (the template is unchanged) and now operates
    /// over empty context.
    pub fn clear_history(&mut self) {
        info!(session = %self.id, "history cleared");
        self.transcript.clear();
        if let Some(ref chain) = self.chain {
            chain.memory().clear();
        }
    }

    /// Runs one user turn and returns the messages appended this turn.
    ///
    /// The user message is always appended. A successful backend call
    /// appends the assistant reply; a recoverable backend failure appends
    /// a synthesized error message instead, so the failure is visible as a
    /// normal transcript entry and the session keeps going. Memory is only
    /// updated on success.
    #[instrument(skip(self, input), fields(session = %self.id, persona = %self.persona_id))]
    pub async fn submit(&mut self, input: &str) -> Result<Vec<ChatMessage>> {
        info!(input_len = input.len(), "user turn started");

        if self.chain.is_none() {
            self.chain = Some(self.build_chain()?);
        }
        let Some(ref chain) = self.chain else {
            return Err(ChatError::config("conversation chain unavailable"));
        };

        let appended_from = self.transcript.len();
        self.transcript.push(ChatMessage::user(input));

        match chain.send(input).await {
            Ok(reply) => {
                self.transcript.push(ChatMessage::assistant(reply));
            }
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "backend call failed, error surfaced in transcript");
                self.transcript
                    .push(ChatMessage::assistant(format!(
                        "Sorry, I encountered an error: {err}"
                    )));
            }
            Err(err) => return Err(err),
        }

        Ok(self.transcript[appended_from..].to_vec())
    }

    /// The full display log in order.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Number of exchange pairs currently retained as prompt memory.
    pub fn memory_depth(&self) -> usize {
        self.chain.as_ref().map_or(0, |c| c.memory().len())
    }

    /// The configured memory window size in pairs.
    pub fn memory_window(&self) -> usize {
        self.window
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    fn build_chain(&self) -> Result<ConversationChain> {
        let persona = self.registry.get(&self.persona_id)?.clone();
        let memory = WindowMemory::with_speaker(self.window, persona.speaker.as_str());
        info!(
            session = %self.id,
            persona = %persona.id,
            window = self.window,
            "conversation chain created"
        );
        ConversationChain::new(persona, memory, Arc::clone(&self.backend), self.params.clone())
    }
}

impl fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("persona_id", &self.persona_id)
            .field("backend", &self.backend.name())
            .field("window", &self.window)
            .field("transcript_len", &self.transcript.len())
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}
