// src/util/testing.rs

use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::env;
use std::rc::Rc;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{NotesApi, TokenStore};
use crate::domain::{ApiError, Credentials, DomainError, Note, NoteId, NotePayload, Tag, TagId};

/// Endpoints of [`NotesApi`], used to inject failures into the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    ActiveNotes,
    ArchivedNotes,
    CreateNote,
    UpdateNote,
    ToggleArchive,
    DeleteNote,
    Tags,
    CreateTag,
    DeleteTag,
}

/// Request recorded by [`MockNotesApi`], in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Login(String),
    ActiveNotes,
    ArchivedNotes,
    CreateNote(NotePayload),
    UpdateNote(NoteId, NotePayload),
    ToggleArchive(NoteId),
    DeleteNote(NoteId),
    Tags,
    CreateTag(String),
    DeleteTag(TagId),
}

/// In-memory stand-in for the notes service.
///
/// Behaves like the real server: notes reference tags by name and unknown
/// names create tags, the archive endpoint flips the flag, deleting a tag
/// removes it from every note. Every request is recorded in [`calls`].
///
/// # Examples
///
/// ```
/// use notekeep::application::NotesApi;
/// use notekeep::util::testing::{note, MockNotesApi};
///
/// let mut api = MockNotesApi::builder()
///     .with_note(note(1, "Groceries", &[(9, "home")]))
///     .build();
/// assert_eq!(api.active_notes().unwrap().len(), 1);
/// ```
///
/// [`calls`]: MockNotesApi::calls
pub struct MockNotesApi {
    notes: Vec<Note>,
    tags: Vec<Tag>,
    next_id: i64,
    login_token: Option<String>,
    failures: HashMap<Endpoint, ApiError>,
    calls: Vec<ApiCall>,
}

impl MockNotesApi {
    pub fn builder() -> MockNotesApiBuilder {
        MockNotesApiBuilder::new()
    }

    pub fn calls(&self) -> &[ApiCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Make `endpoint` fail with `error` from now on.
    pub fn fail(&mut self, endpoint: Endpoint, error: ApiError) {
        self.failures.insert(endpoint, error);
    }

    pub fn recover(&mut self, endpoint: Endpoint) {
        self.failures.remove(&endpoint);
    }

    /// Add an active note behind the client's back.
    pub fn push_active(&mut self, note: Note) {
        self.register_tags(&note);
        self.notes.push(Note {
            archived: false,
            ..note
        });
    }

    fn check(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        match self.failures.get(&endpoint) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn register_tags(&mut self, note: &Note) {
        for tag in &note.tags {
            if !self.tags.iter().any(|t| t.id == tag.id) {
                self.tags.push(tag.clone());
            }
            self.next_id = self.next_id.max(tag.id);
        }
        self.next_id = self.next_id.max(note.id);
    }

    fn tags_by_name(&mut self, names: &[String]) -> Vec<Tag> {
        let mut resolved: Vec<Tag> = Vec::new();
        for name in names {
            let tag = match self.tags.iter().find(|t| &t.name == name) {
                Some(tag) => tag.clone(),
                None => {
                    let tag = Tag {
                        id: self.next_id(),
                        name: name.clone(),
                    };
                    self.tags.push(tag.clone());
                    tag
                }
            };
            if !resolved.contains(&tag) {
                resolved.push(tag);
            }
        }
        resolved
    }

    fn not_found(message: &str) -> ApiError {
        ApiError::Status {
            status: 400,
            message: Some(message.to_string()),
            code: None,
        }
    }

    fn listing(&self, archived: bool) -> Vec<Note> {
        self.notes
            .iter()
            .filter(|n| n.archived == archived)
            .cloned()
            .collect()
    }
}

impl NotesApi for MockNotesApi {
    fn login(&mut self, credentials: &Credentials) -> Result<String, ApiError> {
        self.calls.push(ApiCall::Login(credentials.username.clone()));
        self.check(Endpoint::Login)?;
        self.login_token.clone().ok_or(ApiError::Status {
            status: 401,
            message: Some("Invalid username or password".to_string()),
            code: None,
        })
    }

    fn active_notes(&mut self) -> Result<Vec<Note>, ApiError> {
        self.calls.push(ApiCall::ActiveNotes);
        self.check(Endpoint::ActiveNotes)?;
        Ok(self.listing(false))
    }

    fn archived_notes(&mut self) -> Result<Vec<Note>, ApiError> {
        self.calls.push(ApiCall::ArchivedNotes);
        self.check(Endpoint::ArchivedNotes)?;
        Ok(self.listing(true))
    }

    fn create_note(&mut self, payload: &NotePayload) -> Result<Note, ApiError> {
        self.calls.push(ApiCall::CreateNote(payload.clone()));
        self.check(Endpoint::CreateNote)?;
        let tags = self.tags_by_name(&payload.tags);
        let note = Note {
            id: self.next_id(),
            title: payload.title.clone(),
            content: payload.content.clone(),
            archived: false,
            created_at: None,
            tags,
        };
        self.notes.push(note.clone());
        Ok(note)
    }

    fn update_note(&mut self, id: NoteId, payload: &NotePayload) -> Result<Note, ApiError> {
        self.calls.push(ApiCall::UpdateNote(id, payload.clone()));
        self.check(Endpoint::UpdateNote)?;
        let tags = self.tags_by_name(&payload.tags);
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Self::not_found("Note not found"))?;
        note.title = payload.title.clone();
        note.content = payload.content.clone();
        note.tags = tags;
        Ok(note.clone())
    }

    fn toggle_archive(&mut self, id: NoteId) -> Result<Note, ApiError> {
        self.calls.push(ApiCall::ToggleArchive(id));
        self.check(Endpoint::ToggleArchive)?;
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Self::not_found("Note not found"))?;
        note.archived = !note.archived;
        Ok(note.clone())
    }

    fn delete_note(&mut self, id: NoteId) -> Result<(), ApiError> {
        self.calls.push(ApiCall::DeleteNote(id));
        self.check(Endpoint::DeleteNote)?;
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.notes.len() == before {
            return Err(Self::not_found("Note not found"));
        }
        Ok(())
    }

    fn tags(&mut self) -> Result<Vec<Tag>, ApiError> {
        self.calls.push(ApiCall::Tags);
        self.check(Endpoint::Tags)?;
        Ok(self.tags.clone())
    }

    fn create_tag(&mut self, name: &str) -> Result<Tag, ApiError> {
        self.calls.push(ApiCall::CreateTag(name.to_string()));
        self.check(Endpoint::CreateTag)?;
        let tag = Tag {
            id: self.next_id(),
            name: name.to_string(),
        };
        self.tags.push(tag.clone());
        Ok(tag)
    }

    fn delete_tag(&mut self, id: TagId) -> Result<(), ApiError> {
        self.calls.push(ApiCall::DeleteTag(id));
        self.check(Endpoint::DeleteTag)?;
        if !self.tags.iter().any(|t| t.id == id) {
            return Err(Self::not_found("Tag not found"));
        }
        self.tags.retain(|t| t.id != id);
        for note in self.notes.iter_mut() {
            note.tags.retain(|t| t.id != id);
        }
        Ok(())
    }
}

/// Builder for MockNotesApi
///
/// Provides a fluent interface for seeding server state and failures.
pub struct MockNotesApiBuilder {
    notes: Vec<Note>,
    archived: Vec<Note>,
    tags: Vec<Tag>,
    login_token: Option<String>,
    failures: HashMap<Endpoint, ApiError>,
}

impl MockNotesApiBuilder {
    pub fn new() -> Self {
        Self {
            notes: vec![],
            archived: vec![],
            tags: vec![],
            login_token: None,
            failures: HashMap::new(),
        }
    }

    /// Add an active note; its tags become known to the server
    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_archived_note(mut self, note: Note) -> Self {
        self.archived.push(note);
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Token returned by a successful login
    pub fn with_login_token(mut self, token: impl Into<String>) -> Self {
        self.login_token = Some(token.into());
        self
    }

    pub fn with_failure(mut self, endpoint: Endpoint, error: ApiError) -> Self {
        self.failures.insert(endpoint, error);
        self
    }

    pub fn build(self) -> MockNotesApi {
        let mut api = MockNotesApi {
            notes: vec![],
            tags: self.tags,
            next_id: 0,
            login_token: self.login_token,
            failures: self.failures,
            calls: vec![],
        };
        for tag in &api.tags {
            api.next_id = api.next_id.max(tag.id);
        }
        for note in self.notes {
            api.push_active(note);
        }
        for note in self.archived {
            api.register_tags(&note);
            api.notes.push(Note {
                archived: true,
                ..note
            });
        }
        api
    }
}

impl Default for MockNotesApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Token store kept in memory; clones share the same slot, so a clone can
/// play the part of another window writing the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.set_external(Some(token));
        store
    }

    /// Overwrite the slot without going through a session gate.
    pub fn set_external(&self, token: Option<&str>) {
        *self.slot.borrow_mut() = token.map(str::to_owned);
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, DomainError> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&mut self, token: &str) -> Result<(), DomainError> {
        self.set_external(Some(token));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DomainError> {
        self.set_external(None);
        Ok(())
    }
}

/// Note with non-blank content and the given `(id, name)` tags.
pub fn note(id: NoteId, title: &str, tags: &[(TagId, &str)]) -> Note {
    Note {
        id,
        title: title.to_string(),
        content: format!("Content of {title}"),
        archived: false,
        created_at: None,
        tags: tags.iter().map(|&(id, name)| tag(id, name)).collect(),
    }
}

pub fn tag(id: TagId, name: &str) -> Tag {
    Tag {
        id,
        name: name.to_string(),
    }
}

pub fn always_confirm(_prompt: &str) -> bool {
    true
}

pub fn never_confirm(_prompt: &str) -> bool {
    false
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["ureq", "rustls", "mio"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
