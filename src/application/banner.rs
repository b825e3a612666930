// src/application/banner.rs
use crate::constants::SUCCESS_BANNER_TTL;
use std::time::Instant;

/// Error and success banners of a view.
///
/// The error banner stays until it is dismissed or replaced. The success
/// banner expires [`SUCCESS_BANNER_TTL`] after it was set; expiry is checked
/// on read, nothing is scheduled.
#[derive(Debug, Clone, Default)]
pub struct Banners {
    error: Option<String>,
    success: Option<(String, Instant)>,
}

impl Banners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.set_success_at(message, Instant::now());
    }

    pub fn set_success_at(&mut self, message: impl Into<String>, now: Instant) {
        self.success = Some((message.into(), now));
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Reset both banners, done when an operation starts.
    pub fn clear(&mut self) {
        self.error = None;
        self.success = None;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success_at(Instant::now())
    }

    pub fn success_at(&self, now: Instant) -> Option<&str> {
        self.success
            .as_ref()
            .filter(|(_, set_at)| now.saturating_duration_since(*set_at) < SUCCESS_BANNER_TTL)
            .map(|(message, _)| message.as_str())
    }
}
