//! PII triage HTTP server
//!
//! Masks PII in email bodies and classifies the masked text.

use std::sync::Arc;

use anyhow::{Context, Result};
use inference_client::InferenceClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_core::common::classify::ClassifierHead;
use triage_core::common::pii::RegexBank;
use triage_core::kernel::{
    BaseEmbeddingService, BaseEntityTagger, HttpEmbeddingService, HttpEntityTagger, ServerDeps,
};
use triage_core::server::build_app;
use triage_core::Config;

fn inference_client(endpoint: &str, api_key: Option<&str>) -> InferenceClient {
    let client = InferenceClient::new(endpoint);
    match api_key {
        Some(key) => client.with_api_key(key),
        None => client,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,triage_core=debug,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting PII triage server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(mode = ?config.masking_mode, "Configuration loaded");

    // Compile regex bank (invalid override patterns are fatal)
    let regex_bank = RegexBank::with_overrides(&config.pattern_overrides)
        .context("Failed to compile PII patterns")?;
    if !config.pattern_overrides.is_empty() {
        tracing::info!(
            overrides = config.pattern_overrides.len(),
            "Using overridden PII patterns"
        );
    }

    // Load classifier head
    let classifier_head = ClassifierHead::load(&config.classifier_head_path).with_context(|| {
        format!(
            "Failed to load classifier head from {}",
            config.classifier_head_path.display()
        )
    })?;
    tracing::info!(
        input_dim = classifier_head.input_dim(),
        labels = classifier_head.labels().len(),
        "Classifier head loaded"
    );

    // Model endpoints
    let api_key = config.inference_api_key.as_deref();
    let entity_tagger: Arc<dyn BaseEntityTagger> = Arc::new(HttpEntityTagger::new(
        inference_client(&config.ner_endpoint_url, api_key),
        config.ner_aggregation_strategy,
    ));
    let embedding_service: Arc<dyn BaseEmbeddingService> = Arc::new(HttpEmbeddingService::new(
        inference_client(&config.embedding_endpoint_url, api_key),
    ));

    // Endpoints may still be loading; /health keeps reporting until they are up
    if let Err(e) = entity_tagger.ready().await {
        tracing::warn!(error = %format!("{:#}", e), "Entity tagger not ready");
    }
    if let Err(e) = embedding_service.ready().await {
        tracing::warn!(error = %format!("{:#}", e), "Embedding encoder not ready");
    }

    let deps = Arc::new(ServerDeps::new(
        entity_tagger,
        embedding_service,
        Arc::new(classifier_head),
        Arc::new(regex_bank),
        config.masking_mode,
    ));

    let app = build_app(deps);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
