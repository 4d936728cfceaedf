//! API route definitions.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::schema::InitRequest;
use super::state::AppState;
use crate::registry::RolloutStatus;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/init", post(init))
        .route("/status", get(status))
        .route("/health", get(health))
}

/// `POST /init` -- validate the payload, register the rollout, and schedule
/// the completion call. Responds before the call runs.
async fn init(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let request: InitRequest = match serde_json::from_value(body) {
        Ok(req) => req,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid request body",
                    "details": [{ "field": "body", "message": err.to_string() }]
                })),
            );
        }
    };

    let valid = match request.validate() {
        Ok(valid) => valid,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid request body",
                    "details": err.errors
                })),
            );
        }
    };

    let rollout_id = valid.rollout_id.clone();
    tracing::info!(%rollout_id, model = %valid.model, "rollout accepted");
    state.dispatcher.dispatch(valid);

    (
        StatusCode::OK,
        Json(json!({
            "status": "accepted",
            "rollout_id": rollout_id,
            "message": format!("rollout {} started", rollout_id)
        })),
    )
}

/// `GET /status?rollout_id=<id>` -- polling endpoint for rollout completion.
async fn status(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let Some(rollout_id) = params.get("rollout_id") else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "rollout_id query parameter is required" })),
        );
    };

    let Some(rollout) = state.registry.get(rollout_id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown rollout_id: {}", rollout_id) })),
        );
    };

    if !rollout.status.is_terminal() {
        return (StatusCode::OK, Json(json!({ "terminated": false })));
    }

    let mut info = json!({
        "reason": rollout.status,
        "ended_at": rollout.ended_at.map(|t| t.to_rfc3339()),
    });
    if rollout.status == RolloutStatus::Completed {
        info["num_turns"] = json!(rollout.completed_turns);
    }
    if let Some(error) = &rollout.error {
        info["error"] = json!(error);
    }

    (
        StatusCode::OK,
        Json(json!({ "terminated": true, "info": info })),
    )
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
