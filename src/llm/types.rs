//! Request and response bodies for the `/chat/completions` endpoint.
//!
//! Messages and tools are passed through to the API as received; only the
//! fields this server inspects are typed, the rest travel in `extra` via
//! `serde(flatten)` so callers can supply temperature, max_tokens, and other
//! sampling parameters without this crate enumerating them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One chat message. `content` stays a raw value because the evaluation
/// platform may send string or structured content blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response from a chat-completion call.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub model: String,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_flattens_extra_params() {
        let req = CompletionRequest {
            model: "openai/gpt-4o".into(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: Some(json!("Hello")),
                extra: Map::new(),
            }],
            tools: None,
            extra: [("temperature".to_string(), json!(0.2))]
                .into_iter()
                .collect(),
        };

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["model"], "openai/gpt-4o");
        assert_eq!(value["temperature"], 0.2);
        assert!(value.get("tools").is_none());
        assert_eq!(value["messages"][0]["content"], "Hello");
    }

    #[test]
    fn response_parses_choice_message() {
        let body = json!({
            "id": "cmpl-123",
            "model": "openai/gpt-4o",
            "choices": [{
                "message": { "role": "assistant", "content": "Paris." },
                "finish_reason": "stop"
            }]
        });

        let resp: CompletionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(
            resp.choices[0].message.content,
            Some(json!("Paris."))
        );
    }
}
