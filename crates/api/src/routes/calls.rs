//! Callable operation endpoints.
//!
//! Every operation is exposed as `POST /{name}` taking the callable
//! envelope `{"data": <request>}` and answering `{"result": <response>}`.
//! The caller is resolved from the `Authorization: Bearer` header before
//! dispatch; a missing or unverifiable token simply means the operation
//! runs anonymously and fails its own auth check where one applies.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use common::OrderId;
use doc_store::DocumentStore;
use orders::{
    AdminListOrdersRequest, AdminOrderDetails, AdminOrdersResponse, ApproveOrderRequest,
    AuthContext, CreateOrderRequest, CreateOrderResponse, GetOrderRequest, ListOrdersRequest,
    OrderService, OrderView, PickupPointsResponse, UpdateOrderRequest, UpdateOrderResponse,
    UserDirectory,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S, D>
where
    S: DocumentStore,
    D: UserDirectory,
{
    pub service: OrderService<S, D>,
    pub directory: D,
}

/// The callable request envelope. An absent `data` member reads as the
/// request type's empty value, so presence checks stay in the operations.
#[derive(Debug, Deserialize)]
pub struct CallRequest<T: Default> {
    #[serde(default)]
    pub data: T,
}

/// The callable response envelope.
#[derive(Debug, Serialize)]
pub struct CallResponse<T> {
    pub result: T,
}

fn ok<T: Serialize>(result: T) -> Json<CallResponse<T>> {
    Json(CallResponse { result })
}

/// Resolves the caller from the bearer token, if one verifies.
async fn caller<D: UserDirectory>(directory: &D, headers: &HeaderMap) -> Option<AuthContext> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let token = header.strip_prefix("Bearer ")?;
    match directory.authenticate(token).await {
        Ok(context) => Some(context),
        Err(err) => {
            tracing::debug!(error = %err, "bearer token did not authenticate");
            None
        }
    }
}

/// POST /createOrder — create an order for a post as the buyer.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create_order<S: DocumentStore + 'static, D: UserDirectory + 'static>(
    State(state): State<Arc<AppState<S, D>>>,
    headers: HeaderMap,
    Json(req): Json<CallRequest<CreateOrderRequest>>,
) -> Result<Json<CallResponse<CreateOrderResponse>>, ApiError> {
    let auth = caller(&state.directory, &headers).await;
    let response = state.service.create_order(auth.as_ref(), req.data).await?;
    Ok(ok(response))
}

/// POST /approveOrder — approve an order as the seller. The result is the
/// order's document id.
#[tracing::instrument(skip(state, headers, req))]
pub async fn approve_order<S: DocumentStore + 'static, D: UserDirectory + 'static>(
    State(state): State<Arc<AppState<S, D>>>,
    headers: HeaderMap,
    Json(req): Json<CallRequest<ApproveOrderRequest>>,
) -> Result<Json<CallResponse<OrderId>>, ApiError> {
    let auth = caller(&state.directory, &headers).await;
    let order_id = state.service.approve_order(auth.as_ref(), req.data).await?;
    Ok(ok(order_id))
}

/// POST /updateOrder — admin milestone update.
#[tracing::instrument(skip(state, headers, req))]
pub async fn update_order<S: DocumentStore + 'static, D: UserDirectory + 'static>(
    State(state): State<Arc<AppState<S, D>>>,
    headers: HeaderMap,
    Json(req): Json<CallRequest<UpdateOrderRequest>>,
) -> Result<Json<CallResponse<UpdateOrderResponse>>, ApiError> {
    let auth = caller(&state.directory, &headers).await;
    let response = state.service.update_order(auth.as_ref(), req.data).await?;
    Ok(ok(response))
}

/// POST /getOrderById — enriched order view for a buyer or seller.
#[tracing::instrument(skip(state, headers, req))]
pub async fn get_order_by_id<S: DocumentStore + 'static, D: UserDirectory + 'static>(
    State(state): State<Arc<AppState<S, D>>>,
    headers: HeaderMap,
    Json(req): Json<CallRequest<GetOrderRequest>>,
) -> Result<Json<CallResponse<OrderView>>, ApiError> {
    let auth = caller(&state.directory, &headers).await;
    let view = state.service.get_order_by_id(auth.as_ref(), req.data).await?;
    Ok(ok(view))
}

/// POST /getOrders — the caller's purchases or sales as a bare array.
#[tracing::instrument(skip(state, headers, req))]
pub async fn get_orders<S: DocumentStore + 'static, D: UserDirectory + 'static>(
    State(state): State<Arc<AppState<S, D>>>,
    headers: HeaderMap,
    Json(req): Json<CallRequest<ListOrdersRequest>>,
) -> Result<Json<CallResponse<Vec<OrderView>>>, ApiError> {
    let auth = caller(&state.directory, &headers).await;
    let views = state.service.list_orders(auth.as_ref(), req.data).await?;
    Ok(ok(views))
}

/// POST /getPickupPoints — public pickup point catalogue. Ignores the
/// envelope body and requires no token.
#[tracing::instrument(skip(state))]
pub async fn get_pickup_points<S: DocumentStore + 'static, D: UserDirectory + 'static>(
    State(state): State<Arc<AppState<S, D>>>,
) -> Result<Json<CallResponse<PickupPointsResponse>>, ApiError> {
    let response = state.service.get_pickup_points().await?;
    Ok(ok(response))
}

/// POST /getAllOrders — admin listing of raw order documents.
#[tracing::instrument(skip(state, headers, req))]
pub async fn get_all_orders<S: DocumentStore + 'static, D: UserDirectory + 'static>(
    State(state): State<Arc<AppState<S, D>>>,
    headers: HeaderMap,
    Json(req): Json<CallRequest<AdminListOrdersRequest>>,
) -> Result<Json<CallResponse<AdminOrdersResponse>>, ApiError> {
    let auth = caller(&state.directory, &headers).await;
    let response = state.service.admin_list_orders(auth.as_ref(), req.data).await?;
    Ok(ok(response))
}

/// POST /getOrderDetailsById — admin detail view of one order.
#[tracing::instrument(skip(state, headers, req))]
pub async fn get_order_details_by_id<S: DocumentStore + 'static, D: UserDirectory + 'static>(
    State(state): State<Arc<AppState<S, D>>>,
    headers: HeaderMap,
    Json(req): Json<CallRequest<GetOrderRequest>>,
) -> Result<Json<CallResponse<AdminOrderDetails>>, ApiError> {
    let auth = caller(&state.directory, &headers).await;
    let details = state
        .service
        .admin_order_details(auth.as_ref(), req.data)
        .await?;
    Ok(ok(details))
}
