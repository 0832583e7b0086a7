//! PostgreSQL integration tests
//!
//! These tests share a single PostgreSQL container and run serially so the
//! TRUNCATE-based isolation holds.
//!
//! ```bash
//! cargo test -p doc-store --test postgres_integration
//! ```

use std::sync::Arc;

use doc_store::{
    DocumentId, DocumentStore, FieldUpdates, PostgresDocumentStore, Query, StoreError,
};
use serde_json::json;
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_documents_table.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and a cleared table
async fn get_test_store() -> PostgresDocumentStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE documents")
        .execute(&pool)
        .await
        .unwrap();

    PostgresDocumentStore::new(pool)
}

#[tokio::test]
#[serial]
async fn set_and_get_roundtrip() {
    let store = get_test_store().await;
    let id = DocumentId::new("order-1");

    store
        .set(
            "orders",
            &id,
            json!({"status": "active", "price": 4728, "state": {"isApproved": false}}),
        )
        .await
        .unwrap();

    let doc = store.get("orders", &id).await.unwrap().unwrap();
    assert_eq!(doc.id, id);
    assert_eq!(doc.data["status"], json!("active"));
    assert_eq!(doc.data["state"]["isApproved"], json!(false));
}

#[tokio::test]
#[serial]
async fn insert_generates_distinct_ids() {
    let store = get_test_store().await;

    let a = store.insert("posts", json!({"title": "Bike"})).await.unwrap();
    let b = store.insert("posts", json!({"title": "Sofa"})).await.unwrap();
    assert_ne!(a, b);

    assert!(store.get("posts", &a).await.unwrap().is_some());
    assert!(store.get("posts", &b).await.unwrap().is_some());
}

#[tokio::test]
#[serial]
async fn get_missing_document_returns_none() {
    let store = get_test_store().await;
    let found = store.get("orders", &DocumentId::new("ghost")).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
#[serial]
async fn set_replaces_existing_body() {
    let store = get_test_store().await;
    let id = DocumentId::new("post-1");

    store
        .set("posts", &id, json!({"status": "open"}))
        .await
        .unwrap();
    store
        .set("posts", &id, json!({"status": "hold"}))
        .await
        .unwrap();

    let doc = store.get("posts", &id).await.unwrap().unwrap();
    assert_eq!(doc.data, json!({"status": "hold"}));
}

#[tokio::test]
#[serial]
async fn update_patches_nested_fields_in_place() {
    let store = get_test_store().await;
    let id = DocumentId::new("order-1");
    store
        .set(
            "orders",
            &id,
            json!({
                "status": "active",
                "state": {"isApproved": false, "isPaid": false},
            }),
        )
        .await
        .unwrap();

    let updates = FieldUpdates::new()
        .set("state.isApproved", true)
        .set(
            "history.isApproved",
            json!({"time": 1700000000000i64, "user": "seller-1", "value": true}),
        );
    store.update("orders", &id, updates).await.unwrap();

    let doc = store.get("orders", &id).await.unwrap().unwrap();
    assert_eq!(doc.data["state"], json!({"isApproved": true, "isPaid": false}));
    assert_eq!(doc.data["history"]["isApproved"]["user"], json!("seller-1"));
    assert_eq!(doc.data["status"], json!("active"));
}

#[tokio::test]
#[serial]
async fn update_missing_document_fails_with_not_found() {
    let store = get_test_store().await;
    let err = store
        .update(
            "orders",
            &DocumentId::new("ghost"),
            FieldUpdates::new().set("status", "canceled"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
#[serial]
async fn empty_update_set_is_a_noop() {
    let store = get_test_store().await;
    let id = DocumentId::new("order-1");
    store
        .set("orders", &id, json!({"status": "active"}))
        .await
        .unwrap();

    store.update("orders", &id, FieldUpdates::new()).await.unwrap();

    let doc = store.get("orders", &id).await.unwrap().unwrap();
    assert_eq!(doc.data, json!({"status": "active"}));
}

#[tokio::test]
#[serial]
async fn concurrent_updates_to_different_fields_both_land() {
    let store = get_test_store().await;
    let id = DocumentId::new("order-1");
    store
        .set(
            "orders",
            &id,
            json!({"state": {"isPaid": false, "isDelivered": false}}),
        )
        .await
        .unwrap();

    let store_a = store.clone();
    let store_b = store.clone();
    let id_a = id.clone();
    let id_b = id.clone();

    let (a, b) = tokio::join!(
        tokio::spawn(async move {
            store_a
                .update("orders", &id_a, FieldUpdates::new().set("state.isPaid", true))
                .await
        }),
        tokio::spawn(async move {
            store_b
                .update(
                    "orders",
                    &id_b,
                    FieldUpdates::new().set("state.isDelivered", true),
                )
                .await
        }),
    );
    a.unwrap().unwrap();
    b.unwrap().unwrap();

    // The row lock serializes the two read-patch-write cycles, so neither
    // update overwrites the other.
    let doc = store.get("orders", &id).await.unwrap().unwrap();
    assert_eq!(doc.data, json!({"state": {"isPaid": true, "isDelivered": true}}));
}

#[tokio::test]
#[serial]
async fn delete_is_idempotent() {
    let store = get_test_store().await;
    let id = DocumentId::new("order-1");
    store.set("orders", &id, json!({})).await.unwrap();

    store.delete("orders", &id).await.unwrap();
    assert!(store.get("orders", &id).await.unwrap().is_none());

    store.delete("orders", &id).await.unwrap();
}

#[tokio::test]
#[serial]
async fn query_by_equality_preserves_insertion_order() {
    let store = get_test_store().await;
    for (id, buyer) in [("a", "user-1"), ("b", "user-2"), ("c", "user-1")] {
        store
            .set(
                "orders",
                &DocumentId::new(id),
                json!({"buyerId": buyer, "status": "active"}),
            )
            .await
            .unwrap();
    }

    let docs = store
        .query("orders", Query::new().where_eq("buyerId", "user-1"))
        .await
        .unwrap();
    let ids: Vec<&str> = docs.iter().map(|doc| doc.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[tokio::test]
#[serial]
async fn query_on_nested_field() {
    let store = get_test_store().await;
    store
        .set(
            "orders",
            &DocumentId::new("a"),
            json!({"state": {"isPaid": true}}),
        )
        .await
        .unwrap();
    store
        .set(
            "orders",
            &DocumentId::new("b"),
            json!({"state": {"isPaid": false}}),
        )
        .await
        .unwrap();

    let docs = store
        .query("orders", Query::new().where_eq("state.isPaid", true))
        .await
        .unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id.as_str(), "a");
}

#[tokio::test]
#[serial]
async fn query_array_contains_any_with_limit() {
    let store = get_test_store().await;
    store
        .set(
            "chats",
            &DocumentId::new("chat-1"),
            json!({"postId": "post-1", "participants": ["buyer-1", "seller-1"]}),
        )
        .await
        .unwrap();
    store
        .set(
            "chats",
            &DocumentId::new("chat-2"),
            json!({"postId": "post-1", "participants": ["buyer-2", "seller-1"]}),
        )
        .await
        .unwrap();

    let docs = store
        .query(
            "chats",
            Query::new()
                .where_eq("postId", "post-1")
                .where_array_contains_any(
                    "participants",
                    vec!["buyer-1".to_string(), "seller-1".to_string()],
                )
                .limit(1),
        )
        .await
        .unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id.as_str(), "chat-1");

    let none = store
        .query(
            "chats",
            Query::new()
                .where_eq("postId", "post-1")
                .where_array_contains_any("participants", vec!["stranger".to_string()]),
        )
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
#[serial]
async fn collections_are_isolated() {
    let store = get_test_store().await;
    let id = DocumentId::new("shared");
    store.set("orders", &id, json!({"kind": "order"})).await.unwrap();
    store.set("posts", &id, json!({"kind": "post"})).await.unwrap();

    let order = store.get("orders", &id).await.unwrap().unwrap();
    let post = store.get("posts", &id).await.unwrap().unwrap();
    assert_eq!(order.data, json!({"kind": "order"}));
    assert_eq!(post.data, json!({"kind": "post"}));
}
