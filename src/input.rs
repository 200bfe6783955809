use serde_json::Value;

/// Characters whose presence marks a string as a selector or markup.
const SELECTOR_MARKERS: [char; 4] = ['.', '#', '[', '<'];

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedInput {
    /// Text to run against the document's selector engine.
    Selector(String),
    /// Anything else, wrapped as a collection.
    Value(Value),
}

/// Sniffs the dispatcher input. Only the marker characters are checked; the
/// selector itself is validated by the query.
pub fn parse_input(raw: Value) -> ParsedInput {
    match raw {
        Value::String(text) if looks_like_selector(&text) => ParsedInput::Selector(text),
        other => ParsedInput::Value(other),
    }
}

pub fn looks_like_selector(text: &str) -> bool {
    text.contains(SELECTOR_MARKERS)
}
