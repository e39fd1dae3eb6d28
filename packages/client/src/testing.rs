//! Fixtures shared by the controller tests.

use api::mock::MockTransport;
use api::{Client, Method, ACCESS_TOKEN_KEY};
use serde_json::{json, Value};
use store::MemoryStore;

pub fn profile() -> Value {
    json!({
        "id": "u1",
        "email": "ayse@example.com",
        "full_name": "Ayşe Yılmaz",
        "created_at": "2025-11-18T09:00:00"
    })
}

pub fn product(id: &str, review_count: u32) -> Value {
    json!({
        "id": id,
        "category_id": "phones",
        "brand": "Apple",
        "model": "iPhone 15",
        "price": 49999.0,
        "average_rating": 4.5,
        "review_count": review_count
    })
}

pub fn review(id: &str, product_id: &str, body: &str) -> Value {
    json!({
        "id": id,
        "product_id": product_id,
        "rating": 5,
        "title": "Yorum",
        "body": body,
        "created_at": "2025-11-19T08:00:00",
        "author_alias": "ada"
    })
}

/// A client whose session was restored from storage with token `T1`.
pub async fn signed_in(mock: &MockTransport) -> (Client<MockTransport, MemoryStore>, MemoryStore) {
    let store = MemoryStore::new().with_value(ACCESS_TOKEN_KEY, "T1");
    mock.on(Method::GET, "/users/me", 200, profile());
    let client = Client::new(mock.clone(), store.clone());
    client.initialize().await;
    assert!(client.session().is_authenticated());
    (client, store)
}

pub fn signed_out(mock: &MockTransport) -> Client<MockTransport, MemoryStore> {
    Client::new(mock.clone(), MemoryStore::new())
}
