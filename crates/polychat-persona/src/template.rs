use std::fmt;

use minijinja::{Environment, UndefinedBehavior, context};
use polychat_core::{ChatError, Result};

/// Template variable that receives the rendered conversation history.
pub const HISTORY_VAR: &str = "history";
/// Template variable that receives the latest user input.
pub const INPUT_VAR: &str = "input";

/// A validated persona prompt template.
///
/// Validation happens eagerly: the source must be syntactically well-formed
/// and must reference both `{{ history }}` and `{{ input }}`. A template
/// that drops either variable would silently produce amnesiac or
/// input-blind prompts, so that is rejected up front rather than discovered
/// mid-conversation.
pub struct PromptTemplate {
    env: Environment<'static>,
    source: String,
    persona: String,
}

impl PromptTemplate {
    /// Validates `source` for the given persona id.
    pub fn compile(persona: &str, source: &str) -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        let referenced = env
            .template_from_str(source)
            .map_err(|e| ChatError::invalid_template(persona, e.to_string()))?
            .undeclared_variables(false);
        for var in [HISTORY_VAR, INPUT_VAR] {
            if !referenced.contains(var) {
                return Err(ChatError::invalid_template(
                    persona,
                    format!("missing required placeholder `{{{{ {var} }}}}`"),
                ));
            }
        }

        Ok(Self {
            env,
            source: source.to_string(),
            persona: persona.to_string(),
        })
    }

    /// Renders the prompt with the given history block and user input.
    ///
    /// Rendering is strict: any variable the template references beyond the
    /// two provided ones fails loudly instead of emitting placeholder text.
    pub fn render(&self, history: &str, input: &str) -> Result<String> {
        let tmpl = self
            .env
            .template_from_str(&self.source)
            .map_err(|e| ChatError::Template(e.to_string()))?;
        tmpl.render(context! { history => history, input => input })
            .map_err(|e| {
                ChatError::Template(format!(
                    "render failed for persona '{}': {e}",
                    self.persona
                ))
            })
    }

    /// Persona id this template was validated for.
    pub fn persona(&self) -> &str {
        &self.persona
    }
}

impl fmt::Debug for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptTemplate")
            .field("persona", &self.persona)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_both_variables() {
        let tmpl =
            PromptTemplate::compile("t", "Intro\n{{ history }}\nHuman: {{ input }}\nBot:").unwrap();
        let out = tmpl.render("Human: hi\nBot: hello", "how are you?").unwrap();
        assert_eq!(out, "Intro\nHuman: hi\nBot: hello\nHuman: how are you?\nBot:");
    }

    #[test]
    fn test_render_with_empty_history() {
        let tmpl = PromptTemplate::compile("t", "{{ history }}\nHuman: {{ input }}").unwrap();
        let out = tmpl.render("", "first message").unwrap();
        assert_eq!(out, "\nHuman: first message");
    }

    #[test]
    fn test_missing_input_placeholder_rejected() {
        let err = PromptTemplate::compile("broken", "only {{ history }} here").unwrap_err();
        match err {
            ChatError::InvalidTemplate { persona, reason } => {
                assert_eq!(persona, "broken");
                assert!(reason.contains("input"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_history_placeholder_rejected() {
        let err = PromptTemplate::compile("broken", "only {{ input }} here").unwrap_err();
        match err {
            ChatError::InvalidTemplate { reason, .. } => assert!(reason.contains("history")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_syntax_rejected() {
        let err = PromptTemplate::compile("broken", "{{ history }} {{ input").unwrap_err();
        assert!(matches!(err, ChatError::InvalidTemplate { .. }));
    }

    #[test]
    fn test_undeclared_extra_variable_fails_at_render() {
        let tmpl = PromptTemplate::compile("t", "{{ history }} {{ input }} {{ mood }}").unwrap();
        let err = tmpl.render("h", "i").unwrap_err();
        assert!(matches!(err, ChatError::Template(_)));
    }
}
