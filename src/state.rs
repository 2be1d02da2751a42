// src/state.rs
use std::sync::Arc;

use crate::config::{Config, ImageAllowList};
use crate::error::Result;
use crate::services::quiz_client::QuizClient;
use crate::services::session_manager::SessionManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub sessions: SessionManager,
    pub quiz_client: QuizClient,
    pub images: ImageAllowList,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            sessions: SessionManager::new(config.session_ttl),
            quiz_client: QuizClient::new(config.api_base_url.clone())?,
            images: config.images.clone(),
        })
    }
}
