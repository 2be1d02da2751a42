// src/message.rs
use serde::{Deserialize, Serialize};

/// A quiz as returned by `GET /quiz`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub question: String,
    pub image_url: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// One entry of the page's message log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
pub enum Message {
    System(String),
    User(String),
    Assistant(String),
    Quiz(QuizResponse),
}

impl Message {
    pub fn role(&self) -> &'static str {
        match self {
            Message::System(_) => "system",
            Message::User(_) => "user",
            Message::Assistant(_) => "assistant",
            Message::Quiz(_) => "quiz",
        }
    }

    pub fn as_quiz(&self) -> Option<&QuizResponse> {
        match self {
            Message::Quiz(quiz) => Some(quiz),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
pub struct AnswerForm {
    #[serde(default)]
    pub answer: String,
}

/// Footer form. `answer` is the input's current text; absent when the form carries no input.
#[derive(Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub answer: Option<String>,
}

/// JSON view of a page session.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub session_id: String,
    pub messages: Vec<Message>,
    pub pending_answer: String,
    pub loading: bool,
    pub can_submit: bool,
    pub seen_quiz_ids: Vec<String>,
}
