//! The order document.

use common::{ChatId, PointId, PostId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

use crate::{MilestoneHistory, MilestoneState, OrderStatus, Price};

/// An order as stored in the `orders` collection.
///
/// The document key the store assigns is not part of the body; responses
/// surface it as `orderId`. The body's own `id` is the client-facing order
/// number, minted from the creation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Client-facing order number (epoch milliseconds at creation).
    #[serde(rename = "id")]
    pub number: Timestamp,
    pub status: OrderStatus,
    pub create_time: Timestamp,
    /// Post price plus the delivery fee, captured at creation.
    pub price: Price,
    #[serde(default)]
    pub state: MilestoneState,
    #[serde(default)]
    pub history: MilestoneHistory,
    pub post_id: PostId,
    pub point_id: PointId,
    pub seller_id: UserId,
    pub buyer_id: UserId,
    /// The chat linking the two parties, set when creation ensured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<ChatId>,
}

impl Order {
    /// Returns true if the user is the buyer or the seller.
    pub fn is_party(&self, user: &UserId) -> bool {
        &self.buyer_id == user || &self.seller_id == user
    }

    /// Returns true if the user is the seller.
    pub fn is_seller(&self, user: &UserId) -> bool {
        &self.seller_id == user
    }
}
