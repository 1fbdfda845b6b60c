//! HTTP application assembly.

use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::contact::{ContactPipeline, ContactRouteState, contact_routes};
use crate::error::ContactError;

/// Build the full application: health check, contact endpoint, and the
/// static site when `static_dir` is given.
pub fn app(pipeline: Arc<ContactPipeline>, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .merge(contact_routes(ContactRouteState { pipeline }));

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::custom(panic_response)),
    )
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "contact-desk"
    }))
}

/// Render a panic during request handling as an internal fault.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    ContactError::Internal(format!("panic while handling request: {detail}")).into_response()
}
