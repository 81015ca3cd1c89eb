use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use polychat_core::{ChatError, Result};

use crate::template::PromptTemplate;

/// A chat persona: identity, prompt template and the speaker tag used for
/// its lines in rendered history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Stable identifier used for lookup and switching ("roastbot").
    pub id: String,
    /// Display name shown to users ("RoastBot 🔥").
    pub name: String,
    /// One-line description of the persona's style.
    pub description: String,
    /// Prompt template source. Must reference `{{ history }}` and `{{ input }}`.
    pub template: String,
    /// Tag prefixing assistant lines in rendered history ("RoastBot").
    pub speaker: String,
}

impl Persona {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        template: impl Into<String>,
        speaker: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            template: template.into(),
            speaker: speaker.into(),
        }
    }

    /// Compiles this persona's template.
    pub fn compile_template(&self) -> Result<PromptTemplate> {
        PromptTemplate::compile(&self.id, &self.template)
    }
}

/// Immutable, order-preserving collection of personas.
///
/// Every template is compiled and validated at construction time, so a
/// registry that exists is a registry whose personas can all render.
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
}

impl PersonaRegistry {
    /// Builds a registry from `personas`, validating every entry.
    ///
    /// Fails if the list is empty, if an id is blank or duplicated, or if
    /// any template does not compile with both required placeholders.
    pub fn new(personas: Vec<Persona>) -> Result<Self> {
        if personas.is_empty() {
            return Err(ChatError::config("persona registry must not be empty"));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for persona in &personas {
            if persona.id.trim().is_empty() {
                return Err(ChatError::config(format!(
                    "persona '{}' has an empty id",
                    persona.name
                )));
            }
            if !seen.insert(persona.id.as_str()) {
                return Err(ChatError::config(format!(
                    "duplicate persona id '{}'",
                    persona.id
                )));
            }
            persona.compile_template()?;
        }

        debug!(count = personas.len(), "persona registry validated");
        Ok(Self { personas })
    }

    /// Registry containing the built-in personas.
    pub fn builtin() -> Result<Self> {
        Self::new(crate::builtin::builtin_personas())
    }

    /// Looks up a persona by id.
    pub fn get(&self, id: &str) -> Result<&Persona> {
        self.personas
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ChatError::UnknownPersona(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.personas.iter().any(|p| p.id == id)
    }

    /// All personas, in registration order.
    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    /// The first registered persona, used as the starting selection.
    pub fn default_persona(&self) -> &Persona {
        &self.personas[0]
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}
