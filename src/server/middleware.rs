// Middleware for cross-origin access and request tracing

use tower_http::cors::{Any, CorsLayer};

/// Open CORS policy: any origin, method and header
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
