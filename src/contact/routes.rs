//! HTTP endpoint for the contact form.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{Method, header};
use axum::routing::post;
use tower_http::cors::{Any, CorsLayer};

use super::extract::ContactFields;
use super::pipeline::{ContactPipeline, SubmissionReceipt};
use crate::error::ContactError;

/// Path the site's contact form posts to.
pub const CONTACT_PATH: &str = "/api/contact";

/// Shared state for contact routes.
#[derive(Clone)]
pub struct ContactRouteState {
    pub pipeline: Arc<ContactPipeline>,
}

/// POST /api/contact
async fn submit(
    State(state): State<ContactRouteState>,
    ContactFields(raw): ContactFields,
) -> Result<SubmissionReceipt, ContactError> {
    state.pipeline.submit(raw).await
}

/// Any other method on the contact path.
async fn method_not_allowed() -> ContactError {
    ContactError::MethodNotAllowed
}

/// Open CORS, POST only, `Content-Type` allowed.
pub fn contact_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the contact routes.
pub fn contact_routes(state: ContactRouteState) -> Router {
    Router::new()
        .route(CONTACT_PATH, post(submit).fallback(method_not_allowed))
        .layer(contact_cors())
        .with_state(state)
}
