// src/routes/page.rs
use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Redirect},
};

use crate::{
    error::{AppError, Result},
    message::{AnswerForm, PageSnapshot, SubmitForm},
    routes::render::render_page,
    state::SharedState,
};

fn page_location(id: &str) -> String {
    format!("/sessions/{}", id)
}

pub async fn mount_handler(State(state): State<SharedState>) -> Redirect {
    let id = state.sessions.create_session().await;
    Redirect::to(&page_location(&id))
}

pub async fn page_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let snapshot = state.sessions.snapshot(&id).await?;
    Ok(Html(render_page(&snapshot, &state.images)))
}

pub async fn state_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<PageSnapshot>> {
    Ok(Json(state.sessions.snapshot(&id).await?))
}

// The session lock is released while the backend request is in flight.
pub async fn fetch_quiz_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let exclude = state.sessions.begin_fetch(&id).await?;
    let result = state.quiz_client.fetch_quiz(&exclude).await;
    if let Ok(quiz) = &result {
        tracing::info!(session_id = %id, quiz_id = ?quiz.id, "quiz fetched");
    }
    state.sessions.finish_fetch(&id, result).await?;
    Ok(Redirect::to(&page_location(&id)))
}

pub async fn select_answer_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Form(form): Form<AnswerForm>,
) -> Result<Redirect> {
    state.sessions.select_answer(&id, form.answer).await?;
    Ok(Redirect::to(&page_location(&id)))
}

pub async fn submit_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Form(form): Form<SubmitForm>,
) -> Result<Redirect> {
    if let Some(answer) = form.answer {
        state.sessions.select_answer(&id, answer).await?;
    }
    match state.sessions.submit(&id).await? {
        Some(submission) => {
            tracing::info!(session_id = %id, correct = submission.correct, "answer submitted")
        }
        None => tracing::debug!(session_id = %id, "nothing to submit"),
    }
    Ok(Redirect::to(&page_location(&id)))
}

pub async fn unmount_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.sessions.remove_session(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(id))
    }
}
