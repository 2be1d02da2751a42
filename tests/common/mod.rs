#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    routing::get,
};
use url::Url;

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub exclude: Option<String>,
    pub cache_control: Option<String>,
}

struct MockState {
    responses: Mutex<Vec<(StatusCode, String)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Throwaway quiz backend bound to 127.0.0.1:0.
pub struct MockBackend {
    pub base_url: Url,
    state: Arc<MockState>,
}

impl MockBackend {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn quiz_handler(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state.requests.lock().unwrap().push(RecordedRequest {
        exclude: query.get("exclude").cloned(),
        cache_control: headers
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let mut responses = state.responses.lock().unwrap();
    let (status, body) = if responses.len() > 1 {
        responses.remove(0)
    } else {
        responses[0].clone()
    };
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

/// Serves `responses` in order; the last one repeats.
pub async fn spawn_backend(responses: Vec<(StatusCode, String)>) -> MockBackend {
    assert!(!responses.is_empty());
    let state = Arc::new(MockState {
        responses: Mutex::new(responses),
        requests: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/quiz", get(quiz_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        base_url: Url::parse(&format!("http://{}", addr)).unwrap(),
        state,
    }
}

pub fn quiz_json(id: &str, answer: &str) -> String {
    serde_json::json!({
        "id": id,
        "question": "この世界遺産は何でしょう？　国名:インド",
        "image_url": format!("http://localhost:8000/images/{}.jpg", id),
        "options": [answer, "Colosseum", "Machu Picchu", "Angkor Wat"],
        "answer": answer,
    })
    .to_string()
}

pub fn ok(body: String) -> (StatusCode, String) {
    (StatusCode::OK, body)
}
