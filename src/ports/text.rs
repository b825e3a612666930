// src/ports/text.rs
use crate::application::Banners;
use crate::constants::PREVIEW_WIDTH;
use crate::domain::{Note, Tag};
use crate::util::text::{pluralize, preview};
use std::fmt::Write;

/// Plain-text rendering of the views for the terminal.
#[derive(Debug)]
pub struct TextPresenter {
    preview_width: usize,
}

impl TextPresenter {
    pub fn new() -> Self {
        Self {
            preview_width: PREVIEW_WIDTH,
        }
    }

    pub fn with_preview_width(preview_width: usize) -> Self {
        Self { preview_width }
    }

    /// Header with the count, then one block per note.
    pub fn render_notes(&self, notes: &[Note], label: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", pluralize(notes.len(), label));
        if notes.is_empty() {
            let _ = writeln!(out, "  (none)");
            return out;
        }
        for note in notes {
            out.push('\n');
            out.push_str(&self.render_note(note));
        }
        out
    }

    pub fn render_note(&self, note: &Note) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[{}] {}", note.id, note.title);
        if let Some(created) = note.created_at {
            let _ = writeln!(out, "    created: {}", created.format("%Y-%m-%d"));
        }
        if !note.tags.is_empty() {
            let mut names = note.tag_names();
            names.sort_unstable();
            let _ = writeln!(out, "    tags: {}", names.join(", "));
        }
        let _ = writeln!(out, "    {}", preview(&note.content, self.preview_width));
        out
    }

    pub fn render_tags(&self, tags: &[Tag]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", pluralize(tags.len(), "tag"));
        for tag in tags {
            let _ = writeln!(out, "  [{}] {}", tag.id, tag.name);
        }
        out
    }

    /// Visible banners, error first. Empty when neither is showing.
    pub fn render_banners(&self, banners: &Banners) -> String {
        let mut out = String::new();
        if let Some(error) = banners.error() {
            let _ = writeln!(out, "error: {error}");
        }
        if let Some(success) = banners.success() {
            let _ = writeln!(out, "{success}");
        }
        out
    }
}

impl Default for TextPresenter {
    fn default() -> Self {
        Self::new()
    }
}
