//! Fire-and-forget rollout dispatch.
//!
//! `/init` returns as soon as the job is registered; the completion call runs
//! on a spawned task and writes its terminal outcome back into the registry.
//! Nothing retries and nothing enforces a deadline.

use chrono::Utc;

use crate::api::schema::ValidInit;
use crate::llm::{CompletionRequest, LlmClient, LlmError};
use crate::registry::{Outcome, RolloutRegistry};
use crate::trace::{RolloutSpan, TraceExporter};

#[derive(Clone)]
pub struct Dispatcher {
    llm: LlmClient,
    exporter: TraceExporter,
    registry: RolloutRegistry,
    /// When set, every rollout is failed with this message after the
    /// completion resolves. Exercises the failed path end-to-end.
    force_early_error: Option<String>,
}

impl Dispatcher {
    pub fn new(
        llm: LlmClient,
        exporter: TraceExporter,
        registry: RolloutRegistry,
        force_early_error: Option<String>,
    ) -> Self {
        Self {
            llm,
            exporter,
            registry,
            force_early_error,
        }
    }

    /// Register the rollout and schedule its single completion call.
    pub fn dispatch(&self, init: ValidInit) {
        self.registry.create(&init.rollout_id);

        let worker = self.clone();
        tokio::spawn(async move {
            worker.run(init).await;
        });
    }

    async fn run(&self, init: ValidInit) {
        let rollout_id = init.rollout_id.clone();
        let started_at = Utc::now();
        let span = RolloutSpan::new(&rollout_id, &init.metadata, &init.model, started_at);

        tracing::info!(%rollout_id, model = %init.model, "sending completion request");

        let request = CompletionRequest {
            model: init.model.clone(),
            messages: init.messages,
            tools: init.tools,
            extra: init.extra_params,
        };

        let result = self
            .llm
            .complete(&request, init.model_base_url.as_deref())
            .await;

        match result {
            Ok(response) => {
                if let Some(message) = &self.force_early_error {
                    tracing::error!(%rollout_id, %message, "forcing rollout error");
                    self.exporter.export(&span.finish_err(message)).await;
                    self.registry.complete(
                        &rollout_id,
                        Outcome::Failed {
                            error: message.clone(),
                        },
                    );
                    return;
                }

                tracing::info!(
                    %rollout_id,
                    completion_id = %response.id,
                    "rollout completed"
                );
                self.exporter.export(&span.finish_ok()).await;
                // Single-turn only: num_turns from the request is not honored.
                self.registry
                    .complete(&rollout_id, Outcome::Completed { turns: 1 });
            }
            Err(err) => {
                self.fail(&rollout_id, span, &err).await;
            }
        }
    }

    async fn fail(&self, rollout_id: &str, span: RolloutSpan, err: &LlmError) {
        let error = err.to_string();
        tracing::error!(%rollout_id, %error, "rollout failed");
        self.exporter.export(&span.finish_err(&error)).await;
        self.registry.complete(
            rollout_id,
            Outcome::Failed { error },
        );
    }
}
