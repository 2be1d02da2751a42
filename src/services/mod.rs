// src/services/mod.rs
pub mod quiz_client;
pub mod session_manager;
