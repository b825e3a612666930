// src/domain/mod.rs
pub mod error;
pub mod note;

pub use error::{ApiError, DomainError};
pub use note::{Credentials, Note, NoteId, NotePayload, Tag, TagId};
