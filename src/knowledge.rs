//! Static grounding text for the assistant.
//!
//! The snapshot and prompt templates live under `config/prompts/` and are
//! compiled in, so the running process never reads them from disk.
//! Variables use `{{key}}` syntax.

/// Service facts: locations, accepted items, point values, data-destruction
/// standards.
pub const KNOWLEDGE: &str = include_str!("../config/prompts/knowledge.md");

const PERSONA_TEMPLATE: &str = include_str!("../config/prompts/persona.md");
const QUIZ_REQUEST_TEMPLATE: &str = include_str!("../config/prompts/quiz_request.md");

/// The persona instructions with the knowledge snapshot embedded. Sent as the
/// first history entry of every live conversation.
pub fn system_prompt() -> String {
    PERSONA_TEMPLATE
        .trim()
        .replace("{{knowledge}}", KNOWLEDGE.trim())
}

/// Prompt asking for `count` quiz questions as a JSON array.
pub fn quiz_request(count: usize) -> String {
    QUIZ_REQUEST_TEMPLATE
        .trim()
        .replace("{{count}}", &count.to_string())
}
