//! The callable order operations.
//!
//! [`OrderService`] owns every client-facing order call: create, approve,
//! the admin milestone update, the enriched get/list reads, the pickup
//! point catalogue and the admin listing/detail reads. Each method takes
//! the caller's [`AuthContext`] (or `None` for anonymous calls) plus a
//! typed request and returns a typed response or a [`CallError`].
//!
//! Writes are single-document atomic field updates. There is no
//! transaction spanning the order and the post, so the approve call's
//! post flip can be lost if the process dies between the two writes.

use serde_json::{Map, Value};

use common::{ChatId, OrderId, PointId, PostId, Timestamp, UserId};
use doc_store::{Document, DocumentId, DocumentStore, FieldUpdates, Query};
use domain::{
    resolve_order_messages, Chat, HistoryEntry, Milestone, MilestoneHistory, MilestoneState,
    Order, OrderStatus, Post, PostStatus, Price, UserProfile,
};

use crate::auth::{require_admin, require_auth, AuthContext};
use crate::collections;
use crate::directory::UserDirectory;
use crate::error::{CallError, Result};
use crate::requests::{
    AdminListOrdersRequest, ApproveOrderRequest, CreateOrderRequest, GetOrderRequest,
    ListOrdersRequest, UpdateOrderRequest,
};
use crate::views::{
    AdminOrderDetails, AdminOrdersResponse, CreateOrderResponse, OrderView, PartyDetails,
    PartyView, PickupPointView, PickupPointsResponse, PostSummary, UpdateOrderResponse,
};

/// Flat delivery fee added to the post price at creation, in the same
/// currency unit as post prices.
pub const DEFAULT_DELIVERY_FEE: i64 = 228;

/// Order lifecycle operations over a document store and a user directory.
pub struct OrderService<S, D>
where
    S: DocumentStore,
    D: UserDirectory,
{
    store: S,
    directory: D,
    delivery_fee: Price,
}

impl<S, D> OrderService<S, D>
where
    S: DocumentStore,
    D: UserDirectory,
{
    /// Creates a service with the default delivery fee.
    pub fn new(store: S, directory: D) -> Self {
        Self {
            store,
            directory,
            delivery_fee: Price::new(DEFAULT_DELIVERY_FEE),
        }
    }

    /// Overrides the flat delivery fee added to the post price.
    pub fn with_delivery_fee(mut self, fee: Price) -> Self {
        self.delivery_fee = fee;
        self
    }

    /// Creates an order for a post, as the buyer.
    ///
    /// A repeat call for the same buyer and post short-circuits with the
    /// original order's id, without re-running the post checks. Creation
    /// also ensures a chat exists between the two parties for the post.
    #[tracing::instrument(skip(self, auth))]
    pub async fn create_order(
        &self,
        auth: Option<&AuthContext>,
        request: CreateOrderRequest,
    ) -> Result<CreateOrderResponse> {
        let caller = require_auth(auth, "You must be authenticated to create an order.")?;
        let post_id = require_id(request.post_id, "postId is required.")?;
        let point_id = require_id(request.point_id, "pointId is required.")?;

        let existing = self
            .store
            .query(
                collections::ORDERS,
                Query::new()
                    .where_eq("buyerId", caller.uid.as_str())
                    .where_eq("postId", post_id.as_str())
                    .limit(1),
            )
            .await?;
        if let Some(order) = existing.first() {
            tracing::debug!(order_id = %order.id, "order already exists for buyer and post");
            return Ok(CreateOrderResponse::success(OrderId::new(order.id.as_str())));
        }

        let post_doc = self
            .store
            .get(collections::POSTS, &DocumentId::new(post_id.as_str()))
            .await?
            .ok_or_else(|| CallError::not_found("Post not found"))?;
        let post: Post = post_doc.deserialize()?;

        if !post.status.accepts_orders() {
            return Err(CallError::permission_denied(
                "Invalid post status. Only open posts can be ordered.",
            ));
        }
        if post.user_id == caller.uid {
            return Err(CallError::permission_denied(
                "Buyer and seller cannot be the same user.",
            ));
        }

        let chat_id = self.ensure_chat(&post_id, &caller.uid, &post.user_id).await?;

        let now = Timestamp::now();
        let order = Order {
            number: now,
            status: OrderStatus::Active,
            create_time: now,
            price: post.price + self.delivery_fee,
            state: MilestoneState::default(),
            history: MilestoneHistory::default(),
            post_id,
            point_id,
            seller_id: post.user_id.clone(),
            buyer_id: caller.uid.clone(),
            chat_id: Some(chat_id),
        };

        let doc_id = self
            .store
            .insert(collections::ORDERS, serde_json::to_value(&order)?)
            .await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %doc_id, post_id = %order.post_id, "order created");

        Ok(CreateOrderResponse::success(OrderId::new(doc_id.as_str())))
    }

    /// Marks an order approved, as the seller.
    ///
    /// Sets `state.isApproved`, writes the `history.isApproved` ledger
    /// entry and flips the linked post to `hold`. Returns the order's
    /// document id. Re-approving runs the same writes again.
    #[tracing::instrument(skip(self, auth))]
    pub async fn approve_order(
        &self,
        auth: Option<&AuthContext>,
        request: ApproveOrderRequest,
    ) -> Result<OrderId> {
        let caller = require_auth(auth, "You must be authenticated to approve an order.")?;
        let order_id = require_id(request.order_id, "orderId is required.")?;

        let doc_id = DocumentId::new(order_id.as_str());
        let doc = self
            .store
            .get(collections::ORDERS, &doc_id)
            .await?
            .ok_or_else(|| CallError::not_found("Order not found"))?;
        let order: Order = doc.deserialize()?;

        if !order.is_seller(&caller.uid) {
            return Err(CallError::permission_denied(
                "You do not have permission to approve this order",
            ));
        }

        let entry = HistoryEntry::new(Timestamp::now(), caller.uid.clone(), true);
        let updates = FieldUpdates::new()
            .set("state.isApproved", true)
            .set("history.isApproved", serde_json::to_value(&entry)?);
        self.store.update(collections::ORDERS, &doc_id, updates).await?;

        // Second, uncoordinated write. A crash here leaves the order
        // approved with the post still open.
        self.store
            .update(
                collections::POSTS,
                &DocumentId::new(order.post_id.as_str()),
                FieldUpdates::new().set("status", PostStatus::Hold.as_str()),
            )
            .await?;

        metrics::counter!("orders_approved_total").increment(1);
        tracing::info!(order_id = %doc_id, post_id = %order.post_id, "order approved");

        Ok(order_id)
    }

    /// Overwrites an arbitrary subset of milestones, as an admin.
    ///
    /// Every recognized milestone key in the request rewrites both the
    /// flag and its history entry in one atomic update. Unrecognized keys
    /// are ignored; if nothing matched, nothing is written and the call
    /// still succeeds.
    #[tracing::instrument(skip(self, auth))]
    pub async fn update_order(
        &self,
        auth: Option<&AuthContext>,
        request: UpdateOrderRequest,
    ) -> Result<UpdateOrderResponse> {
        let caller = require_admin(
            auth,
            "You must be logged in to update this order.",
            "You do not have permission to update this order.",
        )?;

        let (order_id, state) = match (request.order_id, request.state) {
            (Some(order_id), Some(state))
                if !order_id.as_str().is_empty() && !state.is_empty() =>
            {
                (order_id, state)
            }
            _ => return Err(CallError::invalid_argument("orderId and state are required.")),
        };

        let doc_id = DocumentId::new(order_id.as_str());
        if self.store.get(collections::ORDERS, &doc_id).await?.is_none() {
            return Err(CallError::not_found("Order not found."));
        }

        let now = Timestamp::now();
        let mut updates = FieldUpdates::new();
        for milestone in Milestone::ALL {
            if let Some(&value) = state.get(milestone.key()) {
                let entry = HistoryEntry::new(now, caller.uid.clone(), value);
                updates.push(format!("state.{}", milestone.key()), value);
                updates.push(
                    format!("history.{}", milestone.key()),
                    serde_json::to_value(&entry)?,
                );
            }
        }

        if !updates.is_empty() {
            self.store.update(collections::ORDERS, &doc_id, updates).await?;
            metrics::counter!("admin_order_updates_total").increment(1);
            tracing::info!(order_id = %doc_id, "admin milestone update applied");
        }

        Ok(UpdateOrderResponse::done())
    }

    /// Returns the enriched view of one order, as the buyer or seller.
    #[tracing::instrument(skip(self, auth))]
    pub async fn get_order_by_id(
        &self,
        auth: Option<&AuthContext>,
        request: GetOrderRequest,
    ) -> Result<OrderView> {
        let caller = require_auth(auth, "You must be authenticated to view this order.")?;
        let order_id = require_id(request.order_id, "orderId is required.")?;

        let doc_id = DocumentId::new(order_id.as_str());
        let doc = self
            .store
            .get(collections::ORDERS, &doc_id)
            .await?
            .ok_or_else(|| CallError::not_found("Order not found."))?;
        let order: Order = doc.deserialize()?;

        if !order.is_party(&caller.uid) {
            return Err(CallError::permission_denied(
                "You do not have permission to view this order",
            ));
        }

        self.enrich_order(&doc.id, &order)
            .await?
            .ok_or_else(|| CallError::not_found("Post not found."))
    }

    /// Lists the caller's orders for one side of the marketplace,
    /// enriched like [`get_order_by_id`](Self::get_order_by_id).
    ///
    /// Orders whose linked post has vanished are dropped from the result
    /// rather than failing the whole call.
    #[tracing::instrument(skip(self, auth))]
    pub async fn list_orders(
        &self,
        auth: Option<&AuthContext>,
        request: ListOrdersRequest,
    ) -> Result<Vec<OrderView>> {
        let caller = require_auth(auth, "You must be authenticated to view orders.")?;

        let docs = self
            .store
            .query(
                collections::ORDERS,
                Query::new().where_eq(request.side.filter_field(), caller.uid.as_str()),
            )
            .await?;

        let views = futures_util::future::try_join_all(docs.iter().map(|doc| async move {
            let order: Order = doc.deserialize()?;
            self.enrich_order(&doc.id, &order).await
        }))
        .await?;

        Ok(views.into_iter().flatten().collect())
    }

    /// Public catalogue of pickup points. The one call with no auth gate.
    #[tracing::instrument(skip(self))]
    pub async fn get_pickup_points(&self) -> Result<PickupPointsResponse> {
        let docs = self
            .store
            .query(collections::PICKUP_POINTS, Query::new())
            .await?;

        let mut list = Vec::with_capacity(docs.len());
        for doc in docs {
            list.push(PickupPointView {
                id: PointId::new(doc.id.as_str()),
                point: doc.deserialize()?,
            });
        }
        Ok(PickupPointsResponse { list })
    }

    /// Admin listing of raw order documents.
    ///
    /// Filters apply in priority order: a document id lookup wins over an
    /// order number filter, which wins over a status filter. A document id
    /// that matches nothing yields an empty listing, not an error.
    #[tracing::instrument(skip(self, auth))]
    pub async fn admin_list_orders(
        &self,
        auth: Option<&AuthContext>,
        request: AdminListOrdersRequest,
    ) -> Result<AdminOrdersResponse> {
        require_admin(
            auth,
            "You must be logged in to view orders.",
            "You do not have permission to view orders.",
        )?;

        if let Some(order_id) = present(request.order_id) {
            let doc = self
                .store
                .get(collections::ORDERS, &DocumentId::new(order_id.as_str()))
                .await?;
            return Ok(AdminOrdersResponse {
                orders: doc.iter().map(|doc| Value::Object(raw_order(doc))).collect(),
            });
        }

        let mut query = Query::new();
        if let Some(number) = request.id {
            query = query.where_eq("id", number.as_millis());
        } else if let Some(status) = request.status.as_deref().filter(|s| !s.is_empty()) {
            if !OrderStatus::parse(status).is_known() {
                return Err(CallError::invalid_argument(format!(
                    "unknown order status: {status}"
                )));
            }
            query = query.where_eq("status", status);
        }

        let docs = self.store.query(collections::ORDERS, query).await?;
        Ok(AdminOrdersResponse {
            orders: docs.iter().map(|doc| Value::Object(raw_order(doc))).collect(),
        })
    }

    /// Admin detail view of one order: the raw document joined with both
    /// party records and the raw post.
    ///
    /// A party the directory cannot resolve comes back as `null` instead
    /// of failing the call.
    #[tracing::instrument(skip(self, auth))]
    pub async fn admin_order_details(
        &self,
        auth: Option<&AuthContext>,
        request: GetOrderRequest,
    ) -> Result<AdminOrderDetails> {
        require_admin(
            auth,
            "You must be logged in to get this order.",
            "You do not have permission to get this order.",
        )?;
        let order_id = require_id(request.order_id, "orderId is required.")?;

        let doc = self
            .store
            .get(collections::ORDERS, &DocumentId::new(order_id.as_str()))
            .await?
            .ok_or_else(|| CallError::not_found("Order not found."))?;
        let order: Order = doc.deserialize()?;

        let (seller, buyer) = tokio::join!(
            self.directory.get_user(&order.seller_id),
            self.directory.get_user(&order.buyer_id),
        );

        let post = self
            .fetch_post(&order.post_id)
            .await?
            .map(|post_doc| post_doc.data);

        Ok(AdminOrderDetails {
            order: raw_order(&doc),
            seller: party_details(&order.seller_id, seller.ok()),
            buyer: party_details(&order.buyer_id, buyer.ok()),
            post,
        })
    }

    /// Joins party profiles, the post and the pickup point onto an order.
    ///
    /// Returns `Ok(None)` when the linked post has vanished; the get call
    /// turns that into not-found while listings drop the row.
    async fn enrich_order(
        &self,
        doc_id: &DocumentId,
        order: &Order,
    ) -> Result<Option<OrderView>> {
        let start = std::time::Instant::now();

        let (seller, buyer, post_doc) = tokio::try_join!(
            self.fetch_profile(&order.seller_id),
            self.fetch_profile(&order.buyer_id),
            self.fetch_post(&order.post_id),
        )?;

        let Some(post_doc) = post_doc else {
            tracing::warn!(order_id = %doc_id, post_id = %order.post_id, "linked post is gone");
            return Ok(None);
        };
        let post: Post = post_doc.deserialize()?;

        let point = self.fetch_point(&order.point_id).await?;

        metrics::histogram!("order_enrichment_seconds").record(start.elapsed().as_secs_f64());

        let image = post.preview_image().to_string();
        Ok(Some(OrderView {
            order_id: OrderId::new(doc_id.as_str()),
            id: order.number,
            create_time: order.create_time,
            price: order.price,
            post: PostSummary {
                id: order.post_id.clone(),
                title: post.title,
                image,
                price: post.price,
            },
            seller: PartyView {
                id: order.seller_id.clone(),
                name: seller.display_name,
                photo_url: seller.photo_url,
            },
            buyer: PartyView {
                id: order.buyer_id.clone(),
                name: buyer.display_name,
                photo_url: buyer.photo_url,
            },
            point,
            status: order.status,
            messages: resolve_order_messages(order.status, &order.state),
        }))
    }

    /// Returns the chat linking the two parties over the post, creating it
    /// if none exists yet.
    async fn ensure_chat(
        &self,
        post_id: &PostId,
        buyer: &UserId,
        seller: &UserId,
    ) -> Result<ChatId> {
        let existing = self
            .store
            .query(
                collections::CHATS,
                Query::new()
                    .where_eq("postId", post_id.as_str())
                    .where_array_contains_any(
                        "participants",
                        vec![buyer.to_string(), seller.to_string()],
                    )
                    .limit(1),
            )
            .await?;
        if let Some(chat) = existing.first() {
            return Ok(ChatId::new(chat.id.as_str()));
        }

        let doc_id = DocumentId::generate();
        let chat_id = ChatId::new(doc_id.as_str());
        let chat = Chat::new(
            chat_id.clone(),
            post_id.clone(),
            buyer.clone(),
            seller.clone(),
            Timestamp::now(),
        );
        self.store
            .set(collections::CHATS, &doc_id, serde_json::to_value(&chat)?)
            .await?;
        tracing::debug!(chat_id = %chat_id, post_id = %post_id, "created chat for order");
        Ok(chat_id)
    }

    async fn fetch_profile(&self, uid: &UserId) -> Result<UserProfile> {
        Ok(self.directory.get_user(uid).await?)
    }

    async fn fetch_post(&self, post_id: &PostId) -> Result<Option<Document>> {
        Ok(self
            .store
            .get(collections::POSTS, &DocumentId::new(post_id.as_str()))
            .await?)
    }

    async fn fetch_point(&self, point_id: &PointId) -> Result<Option<PickupPointView>> {
        if point_id.as_str().is_empty() {
            return Ok(None);
        }
        let Some(doc) = self
            .store
            .get(collections::PICKUP_POINTS, &DocumentId::new(point_id.as_str()))
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(PickupPointView {
            id: point_id.clone(),
            point: doc.deserialize()?,
        }))
    }
}

/// Rejects a missing or empty id with the operation's message.
fn require_id<T: AsRef<str>>(id: Option<T>, message: &str) -> Result<T> {
    id.filter(|id| !id.as_ref().is_empty())
        .ok_or_else(|| CallError::invalid_argument(message))
}

/// Treats an empty id the same as an absent one.
fn present<T: AsRef<str>>(id: Option<T>) -> Option<T> {
    id.filter(|id| !id.as_ref().is_empty())
}

/// The raw document body with the document id merged in, the shape the
/// admin tools consume. A body field named `id` wins over the document id.
fn raw_order(doc: &Document) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("id".to_string(), Value::String(doc.id.to_string()));
    if let Some(fields) = doc.data.as_object() {
        for (key, value) in fields {
            body.insert(key.clone(), value.clone());
        }
    }
    body
}

fn party_details(uid: &UserId, profile: Option<UserProfile>) -> Option<PartyDetails> {
    profile.map(|profile| PartyDetails {
        uid: uid.clone(),
        email: profile.email,
        display_name: profile.display_name,
        photo_url: profile.photo_url,
    })
}
