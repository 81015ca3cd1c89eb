use crate::registry::Persona;

const STANDARD_TEMPLATE: &str = r#"You are a helpful, friendly, and informative AI assistant. You provide clear, accurate, and useful responses to help users with their questions and tasks. Be conversational and engaging while maintaining professionalism.

Current conversation:
{{ history }}
Human: {{ input }}
Assistant:"#;

const ROASTBOT_TEMPLATE: &str = r#"You are RoastBot, a witty and sarcastic AI that responds to everything with clever roasts and burns. You're playfully mean but never truly hurtful. Use humor, sarcasm, and wit in every response. Keep it fun and entertaining!

Current conversation:
{{ history }}
Human: {{ input }}
RoastBot:"#;

const SHAKESPEARE_TEMPLATE: &str = r#"Thou art ShakespeareBot, a most learned and eloquent assistant who doth speak in the manner of the great Bard himself. Respond to all queries in flowery Elizabethan English, with thee, thou, doth, hath, and other period-appropriate language. Be verbose and poetic in thy responses, as befits a true scholar of the Renaissance.

Current conversation:
{{ history }}
Human: {{ input }}
ShakespeareBot:"#;

const EMOJI_TEMPLATE: &str = r#"You are the Emoji Translator Bot! You communicate primarily through emojis and convert everything into emoji-speak. Use lots of emojis, emoticons, and symbols to express ideas. When you must use words, keep them short and fun. Make everything visual and expressive! 🎨✨

Current conversation:
{{ history }}
Human: {{ input }}
Emoji Bot:"#;

/// The stock personas shipped with polychat.
pub fn builtin_personas() -> Vec<Persona> {
    vec![
        Persona::new(
            "standard",
            "Standard Assistant",
            "A helpful, friendly, and informative assistant",
            STANDARD_TEMPLATE,
            "Assistant",
        ),
        Persona::new(
            "roastbot",
            "RoastBot 🔥",
            "Always responds with witty or sarcastic roasts",
            ROASTBOT_TEMPLATE,
            "RoastBot",
        ),
        Persona::new(
            "shakespeare",
            "ShakespeareBot 🎭",
            "Responds in old-English, Shakespeare-style prose",
            SHAKESPEARE_TEMPLATE,
            "ShakespeareBot",
        ),
        Persona::new(
            "emoji",
            "Emoji Translator Bot 😎",
            "Converts everything into emoji-speak",
            EMOJI_TEMPLATE,
            "Emoji Bot",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PersonaRegistry;

    #[test]
    fn test_builtin_registry_validates() {
        let registry = PersonaRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 4);
        let ids: Vec<&str> = registry.personas().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["standard", "roastbot", "shakespeare", "emoji"]);
        assert_eq!(registry.default_persona().id, "standard");
    }

    #[test]
    fn test_builtin_speaker_tags() {
        let registry = PersonaRegistry::builtin().unwrap();
        assert_eq!(registry.get("standard").unwrap().speaker, "Assistant");
        assert_eq!(registry.get("roastbot").unwrap().speaker, "RoastBot");
        assert_eq!(registry.get("shakespeare").unwrap().speaker, "ShakespeareBot");
        assert_eq!(registry.get("emoji").unwrap().speaker, "Emoji Bot");
    }

    #[test]
    fn test_builtin_templates_end_with_speaker_cue() {
        for persona in builtin_personas() {
            assert!(
                persona.template.ends_with(&format!("{}:", persona.speaker)),
                "template for '{}' should end with its speaker cue",
                persona.id
            );
        }
    }

    #[test]
    fn test_builtin_template_renders_prompt_shape() {
        let registry = PersonaRegistry::builtin().unwrap();
        let tmpl = registry.get("roastbot").unwrap().compile_template().unwrap();
        let prompt = tmpl
            .render("Human: hello\nRoastBot: oh look who showed up", "bye")
            .unwrap();
        assert!(prompt.starts_with("You are RoastBot"));
        assert!(prompt.contains("Human: hello\nRoastBot: oh look who showed up"));
        assert!(prompt.ends_with("Human: bye\nRoastBot:"));
    }
}
