// src/routes/mod.rs
pub mod page;
pub mod render;

use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use page::{
    fetch_quiz_handler, mount_handler, page_handler, select_answer_handler, state_handler,
    submit_handler, unmount_handler,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    let session_routes = Router::new()
        .route("/{id}", get(page_handler).delete(unmount_handler))
        .route("/{id}/state", get(state_handler))
        .route("/{id}/quiz", post(fetch_quiz_handler))
        .route("/{id}/answer", post(select_answer_handler))
        .route("/{id}/submit", post(submit_handler));

    Router::new()
        .route("/", get(mount_handler))
        .nest("/sessions", session_routes)
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new("public"))
        .layer(TraceLayer::new_for_http())
}
