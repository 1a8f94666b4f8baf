// HTTP request handlers

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::PredictorServer;

/// Service name reported by `GET /`
pub const SERVICE_MESSAGE: &str = "🤖 Smart City AI Service Active";

/// Version reported by `GET /`
pub const SERVICE_VERSION: &str = "1.0";

/// Format of the `timestamp` field
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Create the application router
pub fn create_router(server: Arc<PredictorServer>) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/predict", post(handle_predict))
        // No cap on request size: oversized bodies must still reach the JSON envelope
        .layer(DefaultBodyLimit::disable())
        .with_state(server)
}

/// Response body for `GET /`
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub timestamp: String,
}

/// Handle GET / - Service name, version and current server time
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: SERVICE_MESSAGE.to_string(),
        version: SERVICE_VERSION.to_string(),
        timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
    })
}

/// Successful response body for `POST /predict`
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub category: String,
    pub confidence: f64,
}

/// Error response body shared by every failure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Handle POST /predict - Classify complaint text
///
/// The body is parsed by hand so that malformed input still gets the JSON
/// error envelope instead of the framework's plain-text rejection.
pub async fn handle_predict(
    State(server): State<Arc<PredictorServer>>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let request: Value = serde_json::from_slice(&body)?;
    let text = extract_text(&request)?;

    let prediction = server.classifier().classify(text)?;

    tracing::info!(
        text = %text,
        category = %prediction.category,
        confidence = prediction.confidence,
        "Prediction served"
    );

    Ok(Json(PredictResponse {
        success: true,
        category: prediction.category,
        confidence: prediction.confidence,
    }))
}

/// Pull the trimmed `text` field out of a request object
fn extract_text(request: &Value) -> Result<&str, ApiError> {
    let fields = match request {
        Value::Object(fields) => fields,
        _ => return Err(ApiError::InvalidBody("Request body must be a JSON object".to_string())),
    };

    let text = match fields.get("text") {
        None | Some(Value::Null) => "",
        Some(Value::String(text)) => text.trim(),
        Some(_) => return Err(ApiError::InvalidBody("Field `text` must be a string".to_string())),
    };

    if text.is_empty() {
        return Err(ApiError::EmptyText);
    }
    Ok(text)
}

/// Request failures, each rendered as `{"success": false, "error": ...}`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing, null or blank `text`
    #[error("No text provided")]
    EmptyText,

    /// Body is not valid JSON
    #[error(transparent)]
    InvalidJson(#[from] serde_json::Error),

    /// Valid JSON of the wrong shape
    #[error("{0}")]
    InvalidBody(String),

    /// Classification failed
    #[error(transparent)]
    Inference(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyText => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
