//! Persona definitions, validated prompt templates and the registry.
//!
//! A [`Persona`] couples a prompt template with a display identity and the
//! speaker tag used for its lines in conversation history. Templates are
//! compiled with minijinja and validated when a [`PersonaRegistry`] is
//! built, so configuration mistakes surface at startup instead of during a
//! chat.

mod builtin;
mod registry;
mod template;

pub use builtin::builtin_personas;
pub use registry::{Persona, PersonaRegistry};
pub use template::{HISTORY_VAR, INPUT_VAR, PromptTemplate};
