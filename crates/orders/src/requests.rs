//! Request payloads accepted by the callable operations.
//!
//! Every field a caller could omit is optional here; presence checks happen
//! in the service so a missing id surfaces as `invalid-argument` with the
//! operation's message rather than as a deserialization failure.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use common::{OrderId, PointId, PostId, Timestamp};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub post_id: Option<PostId>,
    pub point_id: Option<PointId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApproveOrderRequest {
    pub order_id: Option<OrderId>,
}

/// Shared by the party-facing get call and the admin detail call; both take
/// a single order id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetOrderRequest {
    pub order_id: Option<OrderId>,
}

/// Which side of the marketplace a listing call looks at.
///
/// Anything other than `"buy"` lists sales, matching how clients have
/// always called this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    #[default]
    Sell,
}

impl OrderSide {
    pub fn parse(value: &str) -> Self {
        if value == "buy" {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }

    /// The order field the caller's uid is matched against.
    pub fn filter_field(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buyerId",
            OrderSide::Sell => "sellerId",
        }
    }
}

impl<'de> Deserialize<'de> for OrderSide {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(OrderSide::parse(&value))
    }
}

/// The listing filter. The wire field is named `status` for historical
/// reasons; it selects the caller's side, not an order status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOrdersRequest {
    #[serde(rename = "status")]
    pub side: OrderSide,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub order_id: Option<OrderId>,
    /// Milestone keys to overwrite. Unrecognized keys are ignored.
    pub state: Option<HashMap<String, bool>>,
}

/// Admin listing filters, applied in priority order: a document id wins
/// over an order number, which wins over a status filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminListOrdersRequest {
    pub order_id: Option<OrderId>,
    /// Order number filter (the timestamp-derived `id` field).
    pub id: Option<Timestamp>,
    pub status: Option<String>,
}
