// src/routes/render.rs
use std::fmt::Write;

use crate::{
    config::ImageAllowList,
    message::{Message, PageSnapshot, QuizResponse},
};

pub const PAGE_TITLE: &str = "世界遺産クイズ";

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn badge(message: &Message) -> (&'static str, &'static str) {
    match message {
        Message::User(_) => ("U", "badge badge-user"),
        Message::Assistant(_) => ("A", "badge badge-assistant"),
        Message::Quiz(_) => ("Q", "badge badge-muted"),
        Message::System(_) => ("S", "badge badge-muted"),
    }
}

fn render_quiz(out: &mut String, quiz: &QuizResponse, snapshot: &PageSnapshot, images: &ImageAllowList) {
    let action = format!("/sessions/{}/answer", escape_html(&snapshot.session_id));
    let _ = write!(
        out,
        r#"<div class="quiz"><div class="question">{}</div>"#,
        escape_html(&quiz.question)
    );
    if images.is_allowed(&quiz.image_url) {
        let _ = write!(
            out,
            r#"<div class="image"><img src="{}" alt="quiz"></div>"#,
            escape_html(&quiz.image_url)
        );
    } else {
        tracing::warn!(image_url = %quiz.image_url, "image host not allowed");
        out.push_str(r#"<div class="image image-blocked">画像を表示できません</div>"#);
    }
    out.push_str(r#"<div class="options">"#);
    for option in &quiz.options {
        let class = if *option == snapshot.pending_answer {
            "option selected"
        } else {
            "option"
        };
        let escaped = escape_html(option);
        let _ = write!(
            out,
            r#"<form method="post" action="{action}"><button class="{class}" name="answer" value="{escaped}">{escaped}</button></form>"#,
        );
    }
    out.push_str("</div></div>");
}

fn render_footer(out: &mut String, snapshot: &PageSnapshot) {
    let id = escape_html(&snapshot.session_id);
    let (fetch_label, fetch_disabled) = if snapshot.loading {
        ("取得中...", " disabled")
    } else {
        ("問題を取得", "")
    };
    let submit_disabled = if snapshot.can_submit { "" } else { " disabled" };
    let _ = write!(
        out,
        r#"<footer><form method="post" action="/sessions/{id}/quiz"><button class="primary"{fetch_disabled}>{fetch_label}</button></form><form method="post" action="/sessions/{id}/submit" class="answer"><input name="answer" placeholder="選択肢をクリック、または入力" value="{answer}"><button class="secondary"{submit_disabled}>回答する</button></form></footer>"#,
        answer = escape_html(&snapshot.pending_answer),
    );
}

/// Renders the whole quiz page for one session.
pub fn render_page(snapshot: &PageSnapshot, images: &ImageAllowList) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<!DOCTYPE html><html lang="ja"><head><meta charset="utf-8"><title>{PAGE_TITLE}</title><link rel="stylesheet" href="/style.css"></head><body><header><h1>{PAGE_TITLE}</h1></header><main>"#
    );

    for message in &snapshot.messages {
        let (letter, class) = badge(message);
        let _ = write!(
            out,
            r#"<div class="message message-{}"><div class="{class}">{letter}</div><div class="body">"#,
            message.role()
        );
        match message {
            Message::Quiz(quiz) => render_quiz(&mut out, quiz, snapshot, images),
            Message::System(text) | Message::User(text) | Message::Assistant(text) => {
                let _ = write!(out, r#"<div class="text">{}</div>"#, escape_html(text));
            }
        }
        out.push_str("</div></div>");
    }

    out.push_str("</main>");
    render_footer(&mut out, snapshot);
    out.push_str("</body></html>");
    out
}
