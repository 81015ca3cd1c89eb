use std::fmt;
use std::sync::Arc;

use tracing::debug;

use polychat_core::{CompletionBackend, GenerationParams, Result};
use polychat_memory::WindowMemory;
use polychat_persona::{Persona, PromptTemplate};

/// One persona's conversation pipeline: compiled template, memory window
/// and completion backend.
///
/// A chain is bound to a single persona for its whole lifetime. Switching
/// personas means building a new chain; the template closure must never be
/// swapped underneath an existing one.
pub struct ConversationChain {
    persona: Persona,
    template: PromptTemplate,
    memory: WindowMemory,
    backend: Arc<dyn CompletionBackend>,
    params: GenerationParams,
}

impl ConversationChain {
    /// Binds `persona` to a memory window and backend, compiling the
    /// persona's template.
    pub fn new(
        persona: Persona,
        memory: WindowMemory,
        backend: Arc<dyn CompletionBackend>,
        params: GenerationParams,
    ) -> Result<Self> {
        let template = persona.compile_template()?;
        Ok(Self {
            persona,
            template,
            memory,
            backend,
            params,
        })
    }

    /// Runs one full turn: render history, assemble the prompt, call the
    /// backend, and on success record the exchange.
    ///
    /// A failed backend call leaves memory untouched, so retrying the same
    /// input is unaffected by the failure.
    pub async fn send(&self, input: &str) -> Result<String> {
        let history = self.memory.render();
        let prompt = self.template.render(&history, input)?;
        debug!(
            persona = %self.persona.id,
            history_pairs = self.memory.len(),
            prompt_chars = prompt.len(),
            "prompt assembled"
        );

        let completion = self.backend.complete(&prompt, &self.params).await?;
        self.memory.record(input, completion.as_str());
        Ok(completion)
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn memory(&self) -> &WindowMemory {
        &self.memory
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }
}

impl fmt::Debug for ConversationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationChain")
            .field("persona", &self.persona.id)
            .field("memory", &self.memory)
            .field("backend", &self.backend.name())
            .finish_non_exhaustive()
    }
}
