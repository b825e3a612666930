// src/infrastructure/mod.rs
pub mod config;
pub mod http;
pub mod storage;
pub mod terminal;

pub use config::Config;
pub use http::HttpNotesApi;
pub use storage::{FileStorage, FileTokenStore};
pub use terminal::TerminalConfirm;
