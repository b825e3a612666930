// src/application/notes_api.rs
use crate::domain::{ApiError, Credentials, Note, NoteId, NotePayload, Tag, TagId};

/// Port to the notes REST service.
///
/// One method per endpoint. Implementations attach the session token to
/// every request and map non-success responses to [`ApiError`].
pub trait NotesApi {
    /// `POST /auth/login`, returns the issued token
    fn login(&mut self, credentials: &Credentials) -> Result<String, ApiError>;

    /// `GET /notes/active`
    fn active_notes(&mut self) -> Result<Vec<Note>, ApiError>;

    /// `GET /notes/archived`
    fn archived_notes(&mut self) -> Result<Vec<Note>, ApiError>;

    /// `POST /notes/create`
    fn create_note(&mut self, payload: &NotePayload) -> Result<Note, ApiError>;

    /// `PUT /notes/{id}`
    fn update_note(&mut self, id: NoteId, payload: &NotePayload) -> Result<Note, ApiError>;

    /// `PUT /notes/{id}/archive`
    ///
    /// The server flips the archived flag and returns the updated note.
    fn toggle_archive(&mut self, id: NoteId) -> Result<Note, ApiError>;

    /// `DELETE /notes/{id}`
    fn delete_note(&mut self, id: NoteId) -> Result<(), ApiError>;

    /// `GET /tags`
    fn tags(&mut self) -> Result<Vec<Tag>, ApiError>;

    /// `POST /tags`
    fn create_tag(&mut self, name: &str) -> Result<Tag, ApiError>;

    /// `DELETE /tags/{id}`, the server removes the tag from every note
    fn delete_tag(&mut self, id: TagId) -> Result<(), ApiError>;
}
