// src/services/session_manager.rs
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    message::{Message, PageSnapshot, QuizResponse},
    services::quiz_client::QuizClientError,
};

pub const WELCOME_TEXT: &str = "世界遺産クイズへようこそ。ボタンで問題を取得できます。";
pub const FETCH_FAILED_TEXT: &str =
    "取得に失敗しました。バックエンドが起動しているか確認してください。";
pub const CORRECT_TEXT: &str = "正解！";

/// Result of a submitted answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub answer: String,
    pub expected: String,
    pub correct: bool,
}

/// State of one mounted quiz page.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: String,
    messages: Vec<Message>,
    pending_answer: String,
    loading: bool,
    pub last_active: Instant,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            messages: vec![Message::System(WELCOME_TEXT.to_string())],
            pending_answer: String::new(),
            loading: false,
            last_active: Instant::now(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn pending_answer(&self) -> &str {
        &self.pending_answer
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Ids of every quiz shown so far, first occurrence order, no duplicates.
    pub fn seen_quiz_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for id in self
            .messages
            .iter()
            .filter_map(Message::as_quiz)
            .filter_map(|q| q.id.as_deref())
        {
            if !ids.iter().any(|seen| seen == id) {
                ids.push(id.to_string());
            }
        }
        ids
    }

    pub fn last_quiz(&self) -> Option<&QuizResponse> {
        self.messages.iter().rev().find_map(Message::as_quiz)
    }

    pub fn select_answer(&mut self, answer: impl Into<String>) {
        self.pending_answer = answer.into();
    }

    pub fn can_submit(&self) -> bool {
        self.last_quiz().is_some() && !self.pending_answer.is_empty()
    }

    /// Marks the page as loading and returns the ids to exclude from the next fetch.
    pub fn begin_fetch(&mut self) -> Vec<String> {
        self.loading = true;
        self.seen_quiz_ids()
    }

    pub fn finish_fetch(&mut self, result: std::result::Result<QuizResponse, QuizClientError>) {
        match result {
            Ok(quiz) => {
                self.messages.push(Message::Quiz(quiz));
                self.pending_answer.clear();
            }
            Err(err) => {
                tracing::error!(session_id = %self.id, error = %err, "quiz fetch failed");
                self.messages
                    .push(Message::Assistant(FETCH_FAILED_TEXT.to_string()));
            }
        }
        self.loading = false;
    }

    /// Checks the pending answer against the last quiz. `None` when there is nothing to submit.
    pub fn submit(&mut self) -> Option<Submission> {
        if self.pending_answer.is_empty() {
            return None;
        }
        let expected = self.last_quiz()?.answer.clone();
        let answer = std::mem::take(&mut self.pending_answer);
        let correct = answer == expected;

        self.messages.push(Message::User(format!("回答: {}", answer)));
        self.messages.push(Message::Assistant(if correct {
            CORRECT_TEXT.to_string()
        } else {
            format!("不正解… 正解は「{}」", expected)
        }));

        Some(Submission { answer, expected, correct })
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            session_id: self.id.clone(),
            messages: self.messages.clone(),
            pending_answer: self.pending_answer.clone(),
            loading: self.loading,
            can_submit: self.can_submit(),
            seen_quiz_ids: self.seen_quiz_ids(),
        }
    }
}

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Mount a fresh page and return its id.
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let session = Session::new(id.clone());

        let mut guard = self.inner.write().await;
        guard.insert(id.clone(), session);
        tracing::debug!(session_id = %id, "session created");
        id
    }

    /// Run `f` against a session, touching `last_active`.
    async fn with_session<T>(&self, id: &str, f: impl FnOnce(&mut Session) -> T) -> Result<T> {
        let mut guard = self.inner.write().await;
        let session = guard
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        session.last_active = Instant::now();
        Ok(f(session))
    }

    pub async fn snapshot(&self, id: &str) -> Result<PageSnapshot> {
        let guard = self.inner.read().await;
        guard
            .get(id)
            .map(Session::snapshot)
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    pub async fn select_answer(&self, id: &str, answer: impl Into<String>) -> Result<()> {
        let answer = answer.into();
        self.with_session(id, |s| s.select_answer(answer)).await
    }

    pub async fn begin_fetch(&self, id: &str) -> Result<Vec<String>> {
        self.with_session(id, Session::begin_fetch).await
    }

    pub async fn finish_fetch(
        &self,
        id: &str,
        result: std::result::Result<QuizResponse, QuizClientError>,
    ) -> Result<()> {
        self.with_session(id, |s| s.finish_fetch(result)).await
    }

    pub async fn submit(&self, id: &str) -> Result<Option<Submission>> {
        self.with_session(id, Session::submit).await
    }

    /// Unmount a page.
    pub async fn remove_session(&self, session_id: &str) -> bool {
        let mut guard = self.inner.write().await;
        guard.remove(session_id).is_some()
    }

    /// Remove sessions idle longer than ttl. Returns number removed.
    pub async fn purge_expired(&self) -> usize {
        let mut guard = self.inner.write().await;
        let now = Instant::now();
        let before = guard.len();
        guard.retain(|_, s| now.duration_since(s.last_active) < self.ttl);
        before - guard.len()
    }

    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
