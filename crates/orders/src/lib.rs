//! Callable order operations.
//!
//! Every public entry point lives on [`OrderService`] and mirrors one
//! client-facing call: create, approve, fetch, list, the pickup point
//! catalogue and the admin surface. Request and response shapes are typed in
//! [`requests`] and [`views`]; failures are the closed [`CallError`]
//! taxonomy that the transport layer maps onto status codes.

pub mod auth;
pub mod collections;
pub mod directory;
pub mod error;
pub mod requests;
pub mod service;
pub mod views;

pub use auth::AuthContext;
pub use directory::{DirectoryError, MemoryUserDirectory, UserDirectory};
pub use error::{CallError, ErrorKind, Result};
pub use requests::{
    AdminListOrdersRequest, ApproveOrderRequest, CreateOrderRequest, GetOrderRequest,
    ListOrdersRequest, OrderSide, UpdateOrderRequest,
};
pub use service::{DEFAULT_DELIVERY_FEE, OrderService};
pub use views::{
    AdminOrderDetails, AdminOrdersResponse, CreateOrderResponse, OrderView, PartyDetails,
    PartyView, PickupPointView, PickupPointsResponse, PostSummary, UpdateOrderResponse,
};
