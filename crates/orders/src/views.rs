//! Response payloads returned by the callable operations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use common::{OrderId, PointId, PostId, Timestamp, UserId};
use domain::{OrderMessages, OrderStatus, PickupPoint, Price};

/// Result of a create call. The fresh-create and the short-circuit path
/// both return this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    pub message: String,
    pub order_id: OrderId,
}

impl CreateOrderResponse {
    pub fn success(order_id: OrderId) -> Self {
        Self {
            success: true,
            message: "success".to_string(),
            order_id,
        }
    }
}

/// Post fields shown inside an order view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: PostId,
    pub title: String,
    /// First listing image, empty when the post has none.
    pub image: String,
    pub price: Price,
}

/// Party fields shown inside an order view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyView {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// A pickup point with its document id attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupPointView {
    pub id: PointId,
    #[serde(flatten)]
    pub point: PickupPoint,
}

/// The enriched order view returned by the get and list calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: OrderId,
    /// The order number (timestamp-derived), distinct from the document id.
    pub id: Timestamp,
    pub create_time: Timestamp,
    pub price: Price,
    pub post: PostSummary,
    pub seller: PartyView,
    pub buyer: PartyView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<PickupPointView>,
    pub status: OrderStatus,
    pub messages: OrderMessages,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderResponse {
    pub message: String,
}

impl UpdateOrderResponse {
    pub fn done() -> Self {
        Self {
            message: "done.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupPointsResponse {
    pub list: Vec<PickupPointView>,
}

/// Admin listing result. Bodies are raw documents with the document id
/// merged in, not the enriched party view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOrdersResponse {
    pub orders: Vec<Value>,
}

/// Party fields in the admin detail view, straight from the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyDetails {
    pub uid: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Admin detail view: the raw order document with parties and the post
/// joined in. A party that cannot be resolved is `null`, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOrderDetails {
    #[serde(flatten)]
    pub order: Map<String, Value>,
    pub seller: Option<PartyDetails>,
    pub buyer: Option<PartyDetails>,
    pub post: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_point_is_omitted() {
        let view = OrderView {
            order_id: OrderId::new("doc-1"),
            id: Timestamp::from_millis(1_700_000_000_000),
            create_time: Timestamp::from_millis(1_700_000_000_000),
            price: Price::new(1228),
            post: PostSummary {
                id: PostId::new("post-1"),
                title: "Bike".to_string(),
                image: String::new(),
                price: Price::new(1000),
            },
            seller: PartyView {
                id: UserId::new("seller"),
                name: Some("S".to_string()),
                photo_url: None,
            },
            buyer: PartyView {
                id: UserId::new("buyer"),
                name: None,
                photo_url: None,
            },
            point: None,
            status: OrderStatus::Active,
            messages: domain::resolve_order_messages(
                OrderStatus::Active,
                &domain::MilestoneState::default(),
            ),
        };

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("point").is_none());
        assert!(json["seller"].get("photoURL").is_none());
        assert!(json["buyer"].get("name").is_none());
        assert_eq!(json["orderId"], serde_json::json!("doc-1"));
        assert_eq!(json["messages"]["buyer"], serde_json::json!("waiting_for_approval"));
    }

    #[test]
    fn test_admin_details_enrichment_keys_override_document_keys() {
        let mut order = Map::new();
        order.insert("id".to_string(), Value::String("doc-9".to_string()));
        order.insert("post".to_string(), Value::String("stale".to_string()));

        let details = AdminOrderDetails {
            order,
            seller: None,
            buyer: None,
            post: Some(serde_json::json!({"title": "Bike"})),
        };

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["id"], serde_json::json!("doc-9"));
        assert_eq!(json["post"], serde_json::json!({"title": "Bike"}));
        assert_eq!(json["seller"], Value::Null);
    }

    #[test]
    fn test_pickup_point_view_flattens() {
        let view = PickupPointView {
            id: PointId::new("pp-1"),
            point: PickupPoint {
                name: "Depot".to_string(),
                address: "1 Station St".to_string(),
                coordinates: None,
                working_hours: "9-18".to_string(),
            },
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], serde_json::json!("pp-1"));
        assert_eq!(json["name"], serde_json::json!("Depot"));
        assert_eq!(json["workingHours"], serde_json::json!("9-18"));
    }
}
