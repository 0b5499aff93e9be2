//! Reply extraction from loosely shaped chat responses.
//!
//! The endpoint's response shape is not pinned down, so the reply is
//! looked up at several known paths in priority order and the first hit
//! wins.

use serde_json::Value;

/// Reply used when a successful response carries no recognizable answer.
pub const NO_ANSWER_REPLY: &str = "Sorry, I couldn't answer that.";

/// Looks for a reply at one path of the response body.
pub type Extractor = fn(&Value) -> Option<String>;

/// Extractors in priority order.
pub const EXTRACTORS: [Extractor; 4] = [
    direct_content,
    message_content,
    reply_field,
    first_choice_content,
];

/// `{"content": ...}`
fn direct_content(body: &Value) -> Option<String> {
    body.get("content").and_then(text)
}

/// `{"message": {"content": ...}}`
fn message_content(body: &Value) -> Option<String> {
    body.get("message")?.get("content").and_then(text)
}

/// `{"reply": ...}`
fn reply_field(body: &Value) -> Option<String> {
    body.get("reply").and_then(text)
}

/// `{"choices": [{"message": {"content": ...}}]}`
fn first_choice_content(body: &Value) -> Option<String> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")
        .and_then(text)
}

/// Render a field as reply text if it counts as present.
///
/// Non-empty strings, non-zero numbers and `true` count; `null`, `false`,
/// `0`, empty strings, arrays and objects do not.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f.abs() > 0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Apply the extractors in order, returning the first reply found.
pub fn extract_reply(body: &Value) -> Option<String> {
    EXTRACTORS.iter().find_map(|extract| extract(body))
}

/// Like [`extract_reply`], substituting [`NO_ANSWER_REPLY`] on a miss.
pub fn reply_or_default(body: &Value) -> String {
    extract_reply(body).unwrap_or_else(|| NO_ANSWER_REPLY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_content() {
        assert_eq!(reply_or_default(&json!({"content": "A"})), "A");
    }

    #[test]
    fn test_nested_message_content() {
        assert_eq!(reply_or_default(&json!({"message": {"content": "B"}})), "B");
    }

    #[test]
    fn test_reply_field() {
        assert_eq!(reply_or_default(&json!({"reply": "C"})), "C");
    }

    #[test]
    fn test_chat_completion_shape() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "D"}}]});
        assert_eq!(reply_or_default(&body), "D");
    }

    #[test]
    fn test_empty_body_falls_back() {
        assert_eq!(reply_or_default(&json!({})), "Sorry, I couldn't answer that.");
    }

    #[test]
    fn test_priority_order() {
        let body = json!({
            "content": "first",
            "message": {"content": "second"},
            "reply": "third",
            "choices": [{"message": {"content": "fourth"}}],
        });
        assert_eq!(reply_or_default(&body), "first");

        let body = json!({
            "reply": "third",
            "choices": [{"message": {"content": "fourth"}}],
        });
        assert_eq!(reply_or_default(&body), "third");
    }

    #[test]
    fn test_empty_and_null_fields_are_skipped() {
        let body = json!({"content": "", "message": null, "reply": "C"});
        assert_eq!(reply_or_default(&body), "C");

        let body = json!({"content": false, "choices": []});
        assert_eq!(reply_or_default(&body), NO_ANSWER_REPLY);
    }

    #[test]
    fn test_scalar_replies_are_stringified() {
        assert_eq!(reply_or_default(&json!({"reply": 42})), "42");
        assert_eq!(reply_or_default(&json!({"content": 1.5})), "1.5");
    }

    #[test]
    fn test_zero_falls_through() {
        assert_eq!(reply_or_default(&json!({"content": 0, "reply": "C"})), "C");
        assert_eq!(reply_or_default(&json!({"reply": 0.0})), NO_ANSWER_REPLY);
    }

    #[test]
    fn test_non_object_body() {
        assert_eq!(reply_or_default(&json!("plain text")), NO_ANSWER_REPLY);
        assert_eq!(reply_or_default(&Value::Null), NO_ANSWER_REPLY);
        assert_eq!(extract_reply(&json!([1, 2, 3])), None);
    }
}
