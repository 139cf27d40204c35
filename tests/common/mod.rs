#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use qatar_tenders_backend::{
    app::{create_app, AppState},
    config::Settings,
    store::{DocumentStore, InMemoryStore},
};

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryStore,
}

pub fn test_settings() -> Settings {
    Settings::from_lookup(|_| None).unwrap()
}

pub fn app_with_store(store: Arc<dyn DocumentStore>) -> Router {
    create_app(AppState::new(store, test_settings()))
}

pub fn test_app() -> TestApp {
    let store = InMemoryStore::new();
    let router = app_with_store(Arc::new(store.clone()));
    TestApp { router, store }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        send(&self.router, Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        send(&self.router, Method::POST, uri, Some(body)).await
    }

    /// Create a tender and return its id
    pub async fn create_tender(&self, body: Value) -> String {
        let (status, resp) = self.post("/api/tenders", body).await;
        assert_eq!(status, StatusCode::CREATED, "unexpected response: {resp}");
        resp["id"].as_str().unwrap().to_string()
    }
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = router.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub fn road_tender() -> Value {
    json!({
        "title": "Road Maintenance for Al Rayyan",
        "description": "Annual maintenance of municipal roads including resurfacing and signage.",
        "category": "Construction",
        "issuer": "Ministry of Municipality",
        "deadline": "2025-09-30T12:00:00Z"
    })
}

pub fn it_tender() -> Value {
    json!({
        "title": "IT Infrastructure Upgrade - Education Sector",
        "description": "Supply and installation of network equipment and servers for public schools.",
        "category": "IT",
        "budget_qar": 1800000,
        "issuer": "Ministry of Education and Higher Education",
        "location": "Doha, Qatar",
        "deadline": "2025-10-15T09:00:00+03:00",
        "tags": ["network", "servers", "education"]
    })
}
