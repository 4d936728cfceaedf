//! Best-effort span export to the external tracing ingestion service.
//!
//! Each rollout produces one span tagged with its correlation metadata so the
//! evaluation platform can link the trace back to the originating row. Export
//! failures are logged and never influence the rollout outcome.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

use crate::api::schema::RolloutMetadata;

/// One span document as ingested by the tracing service.
#[derive(Debug, Clone, Serialize)]
pub struct RolloutSpan {
    pub span_id: Uuid,
    pub rollout_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_id: Option<String>,
    pub model: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RolloutSpan {
    pub fn new(
        rollout_id: &str,
        metadata: &RolloutMetadata,
        model: &str,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            span_id: Uuid::new_v4(),
            rollout_id: rollout_id.to_string(),
            invocation_id: metadata.invocation_id.clone(),
            experiment_id: metadata.experiment_id.clone(),
            run_id: metadata.run_id.clone(),
            row_id: metadata.row_id.clone(),
            model: model.to_string(),
            started_at,
            ended_at: started_at,
            status: "completed",
            error: None,
        }
    }

    pub fn finish_ok(mut self) -> Self {
        self.ended_at = Utc::now();
        self.status = "completed";
        self
    }

    pub fn finish_err(mut self, error: &str) -> Self {
        self.ended_at = Utc::now();
        self.status = "failed";
        self.error = Some(error.to_string());
        self
    }
}

/// Client for the tracing ingestion endpoint. A `None` endpoint disables
/// export entirely (local runs without tracing credentials).
#[derive(Clone)]
pub struct TraceExporter {
    endpoint: Option<String>,
    api_key: String,
    client: Client,
}

impl TraceExporter {
    pub fn new(endpoint: Option<String>, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build HTTP client");
        Self {
            endpoint,
            api_key,
            client,
        }
    }

    /// Ship one span. Best-effort: a failed export only warns.
    pub async fn export(&self, span: &RolloutSpan) {
        let Some(endpoint) = &self.endpoint else {
            tracing::debug!(rollout_id = %span.rollout_id, "trace export disabled");
            return;
        };

        let result = self
            .client
            .post(endpoint)
            .bearer_auth(&self.api_key)
            .json(span)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!(rollout_id = %span.rollout_id, "span exported");
            }
            Ok(resp) => {
                tracing::warn!(
                    rollout_id = %span.rollout_id,
                    status = %resp.status(),
                    "trace ingestion rejected span"
                );
            }
            Err(err) => {
                tracing::warn!(rollout_id = %span.rollout_id, %err, "trace export failed");
            }
        }
    }
}
