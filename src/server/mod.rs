// Smart City AI - Prediction server
// HTTP service exposing the fitted complaint classifier

mod handlers;
mod middleware;

pub use handlers::{
    create_router, handle_predict, service_info, ApiError, ErrorResponse, PredictResponse,
    ServiceInfo, SERVICE_MESSAGE, SERVICE_VERSION, TIMESTAMP_FORMAT,
};
pub use middleware::cors_layer;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{Config, ServerConfig};
use crate::models::{load_model, TextClassifier};

/// Prediction server
///
/// Holds the classifier loaded at startup. Handlers share it read-only through
/// an `Arc`, so no locking is involved.
pub struct PredictorServer {
    /// Fitted classifier (immutable after load)
    classifier: TextClassifier,
    /// Server configuration
    config: ServerConfig,
}

impl PredictorServer {
    /// Load the model from `config.model_path`
    ///
    /// Fails if the file is missing or corrupt; there is no fallback model.
    pub fn new(config: &Config) -> Result<Self> {
        let artifact = load_model(&config.model_path)?;
        Ok(Self::with_classifier(artifact.classifier, config.server.clone()))
    }

    /// Wrap an already fitted classifier
    pub fn with_classifier(classifier: TextClassifier, config: ServerConfig) -> Self {
        Self { classifier, config }
    }

    /// Build the router with CORS and tracing layers
    pub fn into_router(self) -> axum::Router {
        create_router(Arc::new(self)).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
    }

    /// Bind the configured address and serve until the process exits
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .bind_address
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.config.bind_address))?;

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        self.serve_on(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve_on(self, listener: TcpListener) -> Result<()> {
        let local_addr = listener.local_addr()?;
        tracing::info!(
            classes = ?self.classifier.classes(),
            "Starting Smart City AI service on http://{}",
            local_addr
        );

        let app = self.into_router();
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Get reference to the classifier
    pub fn classifier(&self) -> &TextClassifier {
        &self.classifier
    }
}
