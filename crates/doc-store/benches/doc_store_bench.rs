use criterion::{Criterion, criterion_group, criterion_main};
use doc_store::{DocumentId, DocumentStore, FieldUpdates, MemoryDocumentStore, Query};
use serde_json::json;

fn make_order(buyer: &str) -> serde_json::Value {
    json!({
        "status": "active",
        "buyerId": buyer,
        "sellerId": "seller-1",
        "postId": "post-1",
        "price": 4728,
        "state": {
            "isApproved": false,
            "isPaid": false,
            "isDelivered": false,
            "isSold": false,
            "isPaymentReceived": false
        }
    })
}

fn bench_set_single_document(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("doc_store/set_single_document", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = MemoryDocumentStore::new();
                let id = DocumentId::generate();
                store.set("orders", &id, make_order("buyer-1")).await.unwrap();
            });
        });
    });
}

fn bench_update_nested_field(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = MemoryDocumentStore::new();
    let id = DocumentId::new("order-1");

    rt.block_on(async {
        store.set("orders", &id, make_order("buyer-1")).await.unwrap();
    });

    c.bench_function("doc_store/update_nested_field", |b| {
        b.iter(|| {
            rt.block_on(async {
                store
                    .update(
                        "orders",
                        &id,
                        FieldUpdates::new()
                            .set("state.isApproved", true)
                            .set("history.isApproved", json!({"time": 1, "user": "seller-1"})),
                    )
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_query_by_buyer(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = MemoryDocumentStore::new();

    // Pre-populate with 100 orders across 10 buyers
    rt.block_on(async {
        for i in 0..100 {
            let buyer = format!("buyer-{}", i % 10);
            store.insert("orders", make_order(&buyer)).await.unwrap();
        }
    });

    c.bench_function("doc_store/query_by_buyer_100_docs", |b| {
        b.iter(|| {
            rt.block_on(async {
                let docs = store
                    .query("orders", Query::new().where_eq("buyerId", "buyer-3"))
                    .await
                    .unwrap();
                assert_eq!(docs.len(), 10);
            });
        });
    });
}

fn bench_query_with_limit(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = MemoryDocumentStore::new();

    rt.block_on(async {
        for _ in 0..100 {
            store.insert("chats", json!({"postId": "post-1"})).await.unwrap();
        }
    });

    c.bench_function("doc_store/query_limit_1_of_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                let docs = store
                    .query("chats", Query::new().where_eq("postId", "post-1").limit(1))
                    .await
                    .unwrap();
                assert_eq!(docs.len(), 1);
            });
        });
    });
}

criterion_group!(
    benches,
    bench_set_single_document,
    bench_update_nested_field,
    bench_query_by_buyer,
    bench_query_with_limit
);
criterion_main!(benches);
