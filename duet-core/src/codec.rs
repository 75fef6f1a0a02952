use crate::model::SignalMessage;
use serde_json::Value;

/// Result of classifying one inbound text frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Message(SignalMessage),
    /// Well-formed JSON carrying a `type` this protocol does not know.
    Unrecognized(String),
}

/// Parse a frame. Structural failures (bad JSON, missing `type`, a known tag
/// with missing or mistyped fields) are errors; unknown tags are not.
pub fn decode(text: &str) -> Result<Decoded, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;

    let tag = match value.get("type").and_then(Value::as_str) {
        Some(tag) => tag.to_owned(),
        None => {
            // Let serde produce the "missing field `type`" error.
            return serde_json::from_value::<SignalMessage>(value).map(Decoded::Message);
        }
    };

    if SignalMessage::TAGS.contains(&tag.as_str()) {
        serde_json::from_value(value).map(Decoded::Message)
    } else {
        Ok(Decoded::Unrecognized(tag))
    }
}

pub fn encode(msg: &SignalMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}
