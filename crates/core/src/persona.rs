//! Assistant persona and the grounding instruction sent with every request.

/// Persona used when the user has not customized one.
pub const DEFAULT_PERSONA: &str =
    "You are Kitty, a friendly and encouraging study assistant who happens to be a cat";

/// Display name of the assistant, used for transcript labels.
pub const DEFAULT_ASSISTANT_NAME: &str = "Kitty";

/// Reply the assistant is told to give when the materials lack an answer.
pub const NOT_FOUND_REPLY: &str = "I can't find that information in the study materials.";

/// Build the system instruction: persona, grounding rules, then the materials.
///
/// A blank persona falls back to [`DEFAULT_PERSONA`]. A trailing period on the
/// persona is not doubled.
pub fn system_instruction(persona: &str, context: &str) -> String {
    let persona = persona.trim();
    let persona = if persona.is_empty() {
        DEFAULT_PERSONA
    } else {
        persona.trim_end_matches('.')
    };

    format!(
        "{persona}. Your goal is to answer questions and discuss topics based *only* on the \
         provided study materials. Do not use any external knowledge. If the answer is not in \
         the materials, say \"{NOT_FOUND_REPLY}\" Be friendly and encouraging.\n\n\
         Here are the study materials:\n---\n{context}\n---\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_embeds_persona_and_context() {
        let instruction = system_instruction("You are a pirate tutor", "Mitochondria");
        assert!(instruction.starts_with("You are a pirate tutor. Your goal"));
        assert!(instruction.ends_with("---\nMitochondria\n---\n"));
        assert!(instruction.contains(NOT_FOUND_REPLY));
    }

    #[test]
    fn test_blank_persona_uses_default() {
        let instruction = system_instruction("   ", "x");
        assert!(instruction.starts_with(DEFAULT_PERSONA));
    }

    #[test]
    fn test_trailing_period_not_doubled() {
        let instruction = system_instruction("Be terse.", "x");
        assert!(instruction.starts_with("Be terse. Your goal"));
    }
}
