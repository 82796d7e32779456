//! API routes for smoothie-server

pub mod form;
pub mod health;
pub mod metadata;
pub mod order;

use axum::Router;
use axum::routing::{get, post};
use http::{HeaderName, HeaderValue};
use tower::ServiceBuilder;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/fruit-options", get(order::list_fruit_options))
        .route("/api/orders", post(order::create_order))
        .route("/api/fruit-metadata", get(metadata::fruit_metadata));

    Router::new()
        .route("/", get(form::show_form).post(form::submit_form))
        .route("/health", get(health::health_check))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    XRequestId,
                ))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                ))),
        )
        .with_state(state)
}
