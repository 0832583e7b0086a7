//! HTTP server exposing the callable order operations.
//!
//! Each operation is a `POST /{name}` endpoint speaking the callable
//! envelope, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use doc_store::DocumentStore;
use domain::Price;
use metrics_exporter_prometheus::PrometheusHandle;
use orders::{OrderService, UserDirectory};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::calls::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: DocumentStore + 'static, D: UserDirectory + 'static>(
    state: Arc<AppState<S, D>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/createOrder", post(routes::calls::create_order::<S, D>))
        .route("/approveOrder", post(routes::calls::approve_order::<S, D>))
        .route("/updateOrder", post(routes::calls::update_order::<S, D>))
        .route("/getOrderById", post(routes::calls::get_order_by_id::<S, D>))
        .route("/getOrders", post(routes::calls::get_orders::<S, D>))
        .route(
            "/getPickupPoints",
            post(routes::calls::get_pickup_points::<S, D>),
        )
        .route("/getAllOrders", post(routes::calls::get_all_orders::<S, D>))
        .route(
            "/getOrderDetailsById",
            post(routes::calls::get_order_details_by_id::<S, D>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the shared application state around a document store and a
/// user directory.
pub fn create_state<S: DocumentStore, D: UserDirectory + Clone>(
    store: S,
    directory: D,
    delivery_fee: i64,
) -> Arc<AppState<S, D>> {
    let service =
        OrderService::new(store, directory.clone()).with_delivery_fee(Price::new(delivery_fee));
    Arc::new(AppState { service, directory })
}
