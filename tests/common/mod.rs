#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pizzeria_api::{app, AppState, NewRestaurantPizza, SqliteStore, Store};
use serde_json::Value;
use tower::ServiceExt;

pub const BODY_LIMIT: usize = 64 * 1024;

pub struct TestContext<S> {
    pub router: Router,
    pub store: S,
}

/// Fixture rows: restaurants 1 and 2, pizzas 1 and 2, and one join row
/// (restaurant 1 serves pizza 2 at 10).
pub async fn seed_fixture(store: &dyn Store) {
    store.insert_restaurant("Karen's Pizza Shack", "address1").await.unwrap();
    store.insert_restaurant("Sanjay's Pizza", "address2").await.unwrap();
    store.insert_pizza("Emma", "Dough, Tomato Sauce, Cheese").await.unwrap();
    store.insert_pizza("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni").await.unwrap();
    let new = NewRestaurantPizza::new(10.0, 1, 2).unwrap();
    store.create_restaurant_pizza(&new).await.unwrap();
}

pub async fn sqlite_context() -> TestContext<SqliteStore> {
    let store = SqliteStore::in_memory().await.unwrap();
    seed_fixture(&store).await;
    TestContext {
        router: app(AppState::new(store.clone()), BODY_LIMIT),
        store,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub text: String,
    pub body: Value,
}

impl<S> TestContext<S> {
    pub async fn send(&self, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        TestResponse {
            status,
            content_type,
            text,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }
}
