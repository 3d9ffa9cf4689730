//! Router and shared application state.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::routing::post;
use axum::Router;
use cbrates_common::Country;
use cbrates_fx::RatesRepository;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::MAX_REQUEST_BODY_BYTES;
use crate::handlers;

/// State shared across handlers.
pub struct AppState {
    pub repository: Arc<RatesRepository>,
    /// Bank used when a conversion names none.
    pub default_cb: Country,
}

impl AppState {
    pub fn new(repository: Arc<RatesRepository>, default_cb: Country) -> Self {
        Self {
            repository,
            default_cb,
        }
    }
}

/// Create the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/get_exchange_rates", post(handlers::get_exchange_rates))
        .route("/convert", post(handlers::convert))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}
