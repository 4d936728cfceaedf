//! Wire schema for `/init` and its explicit validation.
//!
//! Required fields are deserialized as `Option` so a malformed body yields a
//! structured list of field-level errors instead of a single serde parse
//! failure.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::llm::ChatMessage;

/// Raw `/init` body as received.
#[derive(Debug, Clone, Deserialize)]
pub struct InitRequest {
    pub completion_params: Option<CompletionParams>,
    pub metadata: Option<RolloutMetadata>,
    pub num_turns: Option<u32>,
    /// Per-rollout override of the configured inference endpoint.
    pub model_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionParams {
    pub model: Option<String>,
    pub messages: Option<Vec<ChatMessage>>,
    pub tools: Option<Vec<Value>>,
    /// Remaining sampling parameters (temperature, max_tokens, ...), passed
    /// through to the completion API untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Correlation metadata linking a trace back to its evaluation row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolloutMetadata {
    pub rollout_id: Option<String>,
    pub invocation_id: Option<String>,
    pub experiment_id: Option<String>,
    pub run_id: Option<String>,
    pub row_id: Option<String>,
}

/// One field-level schema violation.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
#[error("invalid init request: {} field error(s)", errors.len())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

/// An `/init` body that passed validation.
#[derive(Debug, Clone)]
pub struct ValidInit {
    pub rollout_id: String,
    pub metadata: RolloutMetadata,
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Option<Vec<Value>>,
    pub extra_params: Map<String, Value>,
    pub num_turns: Option<u32>,
    pub model_base_url: Option<String>,
}

impl InitRequest {
    /// Check the fixed schema and collect every violation. Pure.
    pub fn validate(self) -> Result<ValidInit, ValidationError> {
        let mut errors = Vec::new();

        let metadata = match self.metadata {
            Some(m) => m,
            None => {
                errors.push(FieldError {
                    field: "metadata".into(),
                    message: "metadata is required".into(),
                });
                RolloutMetadata {
                    rollout_id: None,
                    invocation_id: None,
                    experiment_id: None,
                    run_id: None,
                    row_id: None,
                }
            }
        };

        let rollout_id = match metadata.rollout_id.as_deref() {
            Some(id) if !id.is_empty() => Some(id.to_string()),
            _ => {
                errors.push(FieldError {
                    field: "metadata.rollout_id".into(),
                    message: "rollout_id is required".into(),
                });
                None
            }
        };

        let (model, messages, tools, extra_params) = match self.completion_params {
            Some(params) => {
                let model = match params.model.as_deref() {
                    Some(m) if !m.is_empty() => Some(m.to_string()),
                    _ => {
                        errors.push(FieldError {
                            field: "completion_params.model".into(),
                            message: "model is required in completion_params".into(),
                        });
                        None
                    }
                };
                let messages = match params.messages {
                    Some(msgs) if !msgs.is_empty() => Some(msgs),
                    _ => {
                        errors.push(FieldError {
                            field: "completion_params.messages".into(),
                            message: "messages is required and must be non-empty".into(),
                        });
                        None
                    }
                };
                (model, messages, params.tools, params.extra)
            }
            None => {
                errors.push(FieldError {
                    field: "completion_params".into(),
                    message: "completion_params is required".into(),
                });
                (None, None, None, Map::new())
            }
        };

        if let Some(0) = self.num_turns {
            errors.push(FieldError {
                field: "num_turns".into(),
                message: "num_turns must be at least 1".into(),
            });
        }

        if !errors.is_empty() {
            return Err(ValidationError { errors });
        }

        // Unwraps cannot fire: a missing value always pushed an error above.
        Ok(ValidInit {
            rollout_id: rollout_id.unwrap(),
            metadata,
            model: model.unwrap(),
            messages: messages.unwrap(),
            tools,
            extra_params,
            num_turns: self.num_turns,
            model_base_url: self.model_base_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> InitRequest {
        serde_json::from_value(body).expect("body should deserialize")
    }

    fn full_body() -> Value {
        json!({
            "completion_params": {
                "model": "openai/gpt-4o",
                "messages": [{ "role": "user", "content": "Hello" }],
                "temperature": 0.7
            },
            "metadata": {
                "rollout_id": "rll_1",
                "invocation_id": "inv_1",
                "experiment_id": "exp_1",
                "run_id": "run_1",
                "row_id": "row_1"
            },
            "num_turns": 3
        })
    }

    #[test]
    fn valid_body_passes() {
        let valid = parse(full_body()).validate().expect("should validate");
        assert_eq!(valid.rollout_id, "rll_1");
        assert_eq!(valid.model, "openai/gpt-4o");
        assert_eq!(valid.messages.len(), 1);
        assert_eq!(valid.num_turns, Some(3));
        assert_eq!(valid.extra_params["temperature"], json!(0.7));
        assert_eq!(valid.metadata.row_id.as_deref(), Some("row_1"));
    }

    #[test]
    fn missing_rollout_id_is_rejected() {
        let mut body = full_body();
        body["metadata"]
            .as_object_mut()
            .unwrap()
            .remove("rollout_id");

        let err = parse(body).validate().unwrap_err();
        assert!(err
            .errors
            .iter()
            .any(|e| e.field == "metadata.rollout_id"));
    }

    #[test]
    fn missing_model_is_rejected() {
        let mut body = full_body();
        body["completion_params"]
            .as_object_mut()
            .unwrap()
            .remove("model");

        let err = parse(body).validate().unwrap_err();
        assert!(err
            .errors
            .iter()
            .any(|e| e.field == "completion_params.model"));
    }

    #[test]
    fn empty_messages_are_rejected() {
        let mut body = full_body();
        body["completion_params"]["messages"] = json!([]);

        let err = parse(body).validate().unwrap_err();
        assert!(err
            .errors
            .iter()
            .any(|e| e.field == "completion_params.messages"));
    }

    #[test]
    fn empty_body_reports_every_missing_block() {
        let err = parse(json!({})).validate().unwrap_err();
        let fields: Vec<_> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"completion_params"));
        assert!(fields.contains(&"metadata"));
    }

    #[test]
    fn zero_num_turns_is_rejected() {
        let mut body = full_body();
        body["num_turns"] = json!(0);

        let err = parse(body).validate().unwrap_err();
        assert!(err.errors.iter().any(|e| e.field == "num_turns"));
    }
}
