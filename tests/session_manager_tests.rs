use quiz_chat::message::{Message, QuizResponse};
use quiz_chat::services::quiz_client::QuizClientError;
use quiz_chat::services::session_manager::{
    CORRECT_TEXT, FETCH_FAILED_TEXT, Session, SessionManager, WELCOME_TEXT,
};
use reqwest::StatusCode;
use std::time::Duration;
use tokio::time::sleep;

fn quiz(id: Option<&str>, answer: &str) -> QuizResponse {
    QuizResponse {
        id: id.map(str::to_string),
        question: "この世界遺産は何でしょう？".to_string(),
        image_url: "http://localhost:8000/images/x.jpg".to_string(),
        options: vec![answer.to_string(), "Colosseum".to_string()],
        answer: answer.to_string(),
    }
}

fn fetched(session: &mut Session, q: QuizResponse) -> Vec<String> {
    let exclude = session.begin_fetch();
    session.finish_fetch(Ok(q));
    exclude
}

#[test]
fn new_session_is_seeded_with_welcome() {
    let session = Session::new("s");
    assert_eq!(session.messages(), &[Message::System(WELCOME_TEXT.to_string())]);
    assert!(session.last_quiz().is_none());
    assert!(session.seen_quiz_ids().is_empty());
    assert!(!session.is_loading());
    assert!(!session.can_submit());
}

#[test]
fn seen_ids_track_prior_quizzes_without_duplicates() {
    let mut session = Session::new("s");
    assert!(fetched(&mut session, quiz(Some("a"), "Taj Mahal")).is_empty());
    assert_eq!(fetched(&mut session, quiz(Some("b"), "Taj Mahal")), vec!["a"]);
    assert_eq!(fetched(&mut session, quiz(None, "Taj Mahal")), vec!["a", "b"]);
    assert_eq!(fetched(&mut session, quiz(Some("a"), "Taj Mahal")), vec!["a", "b"]);
    assert_eq!(session.seen_quiz_ids(), vec!["a", "b"]);
}

#[test]
fn last_quiz_is_most_recent() {
    let mut session = Session::new("s");
    fetched(&mut session, quiz(Some("a"), "Taj Mahal"));
    fetched(&mut session, quiz(Some("b"), "Petra"));
    session.select_answer("Petra");
    session.submit();
    assert_eq!(session.last_quiz().and_then(|q| q.id.as_deref()), Some("b"));
}

#[test]
fn submit_is_noop_without_quiz_or_answer() {
    let mut session = Session::new("s");
    session.select_answer("Taj Mahal");
    assert_eq!(session.submit(), None);
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.pending_answer(), "Taj Mahal");

    let mut session = Session::new("s");
    fetched(&mut session, quiz(Some("a"), "Taj Mahal"));
    let before = session.messages().to_vec();
    assert_eq!(session.submit(), None);
    assert_eq!(session.messages(), before.as_slice());
}

#[test]
fn correct_answer_is_reported() {
    let mut session = Session::new("s");
    fetched(&mut session, quiz(Some("a"), "Taj Mahal"));
    session.select_answer("Taj Mahal");
    assert!(session.can_submit());

    let submission = session.submit().unwrap();
    assert!(submission.correct);
    let messages = session.messages();
    assert_eq!(messages[messages.len() - 2], Message::User("回答: Taj Mahal".to_string()));
    assert_eq!(messages[messages.len() - 1], Message::Assistant(CORRECT_TEXT.to_string()));
    assert_eq!(session.pending_answer(), "");
}

#[test]
fn wrong_answer_reveals_correct_one() {
    let mut session = Session::new("s");
    fetched(&mut session, quiz(Some("a"), "Taj Mahal"));
    session.select_answer("Colosseum");

    let submission = session.submit().unwrap();
    assert!(!submission.correct);
    assert_eq!(submission.expected, "Taj Mahal");
    assert_eq!(
        session.messages().last(),
        Some(&Message::Assistant("不正解… 正解は「Taj Mahal」".to_string()))
    );
    assert_eq!(session.pending_answer(), "");
}

#[test]
fn comparison_is_exact() {
    let mut session = Session::new("s");
    fetched(&mut session, quiz(Some("a"), "Taj Mahal"));
    session.select_answer("taj mahal");
    assert!(!session.submit().unwrap().correct);
}

#[test]
fn failed_fetch_appends_one_failure_message() {
    let mut session = Session::new("s");
    session.select_answer("draft");
    session.begin_fetch();
    assert!(session.is_loading());
    session.finish_fetch(Err(QuizClientError::Status(StatusCode::INTERNAL_SERVER_ERROR)));

    assert!(!session.is_loading());
    assert_eq!(session.messages().len(), 2);
    assert_eq!(
        session.messages()[1],
        Message::Assistant(FETCH_FAILED_TEXT.to_string())
    );
    assert!(session.last_quiz().is_none());
    assert_eq!(session.pending_answer(), "draft");
}

#[test]
fn successful_fetch_clears_pending_answer() {
    let mut session = Session::new("s");
    fetched(&mut session, quiz(Some("a"), "Taj Mahal"));
    session.select_answer("Colosseum");
    fetched(&mut session, quiz(Some("b"), "Petra"));
    assert_eq!(session.pending_answer(), "");
    assert!(!session.is_loading());
}

#[tokio::test]
async fn manager_routes_intents_by_id() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    let sid = mgr.create_session().await;

    let exclude = mgr.begin_fetch(&sid).await.unwrap();
    assert!(exclude.is_empty());
    assert!(mgr.snapshot(&sid).await.unwrap().loading);
    mgr.finish_fetch(&sid, Ok(quiz(Some("a"), "Taj Mahal"))).await.unwrap();
    mgr.select_answer(&sid, "Taj Mahal").await.unwrap();

    let submission = mgr.submit(&sid).await.unwrap().unwrap();
    assert!(submission.correct);
    let snapshot = mgr.snapshot(&sid).await.unwrap();
    assert_eq!(snapshot.messages.len(), 4);
    assert_eq!(snapshot.seen_quiz_ids, vec!["a"]);
    assert!(!snapshot.can_submit);

    assert!(mgr.submit("missing").await.is_err());
}

#[tokio::test]
async fn test_session_expiration() {
    let mgr = SessionManager::new(Duration::from_millis(10));
    let sid = mgr.create_session().await;

    sleep(Duration::from_millis(20)).await;

    let removed_count = mgr.purge_expired().await;
    assert_eq!(removed_count, 1, "Should have removed 1 expired session");
    assert!(mgr.is_empty().await);
    assert!(
        !mgr.remove_session(&sid).await,
        "Session should already be gone"
    );
}
