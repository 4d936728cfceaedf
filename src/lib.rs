//! rollout-relay -- Reference remote rollout processor server.
//!
//! A thin HTTP surface that wires an evaluation platform to an
//! OpenAI-compatible LLM API: `POST /init` registers a rollout and fires one
//! asynchronous chat-completion, a span is exported to a tracing service with
//! correlation metadata, and `GET /status` polls for the terminal outcome.

pub mod api;
pub mod config;
pub mod dispatch;
pub mod llm;
pub mod registry;
pub mod trace;

use anyhow::Result;

/// Start the rollout-relay server.
///
/// `force_early_error` fails every rollout with the given message after its
/// completion call resolves; used to exercise the failure path.
pub async fn serve(config: config::Config, force_early_error: Option<String>) -> Result<()> {
    let registry = registry::RolloutRegistry::new();

    let llm = llm::LlmClient::new(config.llm_api_key.clone(), config.llm_base_url.clone());
    let exporter = trace::TraceExporter::new(
        config.tracing_endpoint.clone(),
        config.tracing_api_key.clone(),
    );
    let dispatcher =
        dispatch::Dispatcher::new(llm, exporter, registry.clone(), force_early_error);

    let state = api::state::AppState {
        registry,
        dispatcher,
    };
    let app = api::router(state);

    let addr: std::net::SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!(%addr, "rollout-relay listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
