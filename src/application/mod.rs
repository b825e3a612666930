// src/application/mod.rs
pub mod archived_view;
pub mod banner;
pub mod confirm;
pub mod login;
pub mod notes_api;
pub mod notes_view;
pub mod session;
pub mod tag_selection;

pub use archived_view::ArchivedView;
pub use banner::Banners;
pub use confirm::Confirm;
pub use login::LoginForm;
pub use notes_api::NotesApi;
pub use notes_view::NotesView;
pub use session::{Route, SessionGate, TokenStore};
pub use tag_selection::{FormKind, NoteForm, TagSelection};

/// Result of a user action that may be suppressed before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The request was issued and succeeded.
    Applied,
    /// Validation failed or the user declined confirmation; nothing was sent.
    Skipped,
}
