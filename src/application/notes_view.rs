// src/application/notes_view.rs
use crate::application::{Banners, Confirm, FormKind, NoteForm, NotesApi, Outcome};
use crate::constants::messages;
use crate::domain::{ApiError, DomainError, Note, NoteId, NotePayload, Tag, TagId};
use tracing::{debug, error, info, instrument, warn};

/// Notes satisfying `filter`: all of `source` when unset, otherwise the
/// subsequence tagged with that id. Order is preserved.
pub fn filter_by_tag(source: &[Note], filter: Option<TagId>) -> Vec<Note> {
    match filter {
        None => source.to_vec(),
        Some(tag_id) => source.iter().filter(|n| n.has_tag(tag_id)).cloned().collect(),
    }
}

/// Controller of the active-notes view.
///
/// Holds the authoritative list fetched from the server (`all_notes`), the
/// tag filter, and the derived `notes`. Every write to `all_notes` or to the
/// filter recomputes the derived list. Every successful mutation refetches
/// from the server instead of patching local state.
pub struct NotesView<A: NotesApi, C: Confirm> {
    api: A,
    confirm: C,
    all_notes: Vec<Note>,
    notes: Vec<Note>,
    filter_tag_id: Option<TagId>,
    tags: Vec<Tag>,
    create_form: NoteForm,
    edit_form: NoteForm,
    editing: Option<NoteId>,
    loading: bool,
    banners: Banners,
}

impl<A: NotesApi, C: Confirm> NotesView<A, C> {
    pub fn new(api: A, confirm: C) -> Self {
        Self {
            api,
            confirm,
            all_notes: Vec::new(),
            notes: Vec::new(),
            filter_tag_id: None,
            tags: Vec::new(),
            create_form: NoteForm::new(),
            edit_form: NoteForm::new(),
            editing: None,
            loading: false,
            banners: Banners::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    /// Filtered view.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn all_notes(&self) -> &[Note] {
        &self.all_notes
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn filter_tag_id(&self) -> Option<TagId> {
        self.filter_tag_id
    }

    pub fn editing(&self) -> Option<NoteId> {
        self.editing
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn banners(&self) -> &Banners {
        &self.banners
    }

    pub fn banners_mut(&mut self) -> &mut Banners {
        &mut self.banners
    }

    pub fn form(&self, kind: FormKind) -> &NoteForm {
        match kind {
            FormKind::Create => &self.create_form,
            FormKind::Edit => &self.edit_form,
        }
    }

    pub fn form_mut(&mut self, kind: FormKind) -> &mut NoteForm {
        match kind {
            FormKind::Create => &mut self.create_form,
            FormKind::Edit => &mut self.edit_form,
        }
    }

    /// Initial load: notes and tags.
    pub fn load(&mut self) -> Result<(), ApiError> {
        let notes = self.fetch_notes();
        // tag failures are logged only
        let _ = self.fetch_tags();
        notes
    }

    pub fn set_filter(&mut self, tag_id: Option<TagId>) {
        debug!(?tag_id, "Setting tag filter");
        self.filter_tag_id = tag_id;
        self.recompute();
    }

    pub fn apply_filter(&self, source: &[Note]) -> Vec<Note> {
        filter_by_tag(source, self.filter_tag_id)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn fetch_notes(&mut self) -> Result<(), ApiError> {
        self.banners.dismiss_error();
        match self.api.active_notes() {
            Ok(notes) => {
                debug!(count = notes.len(), "Fetched active notes");
                self.set_all_notes(notes);
                Ok(())
            }
            Err(e) => Err(self.report(e, messages::LOAD_NOTES_FAILED, "Error fetching notes")),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn fetch_tags(&mut self) -> Result<(), ApiError> {
        match self.api.tags() {
            Ok(tags) => {
                debug!(count = tags.len(), "Fetched tags");
                self.tags = tags;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error fetching tags");
                Err(e)
            }
        }
    }

    /// Creates a tag and optionally selects it in the `target` form.
    ///
    /// Blank names are ignored without a request. Returns the created tag,
    /// or `None` when skipped or failed.
    #[instrument(level = "debug", skip(self))]
    pub fn create_tag(&mut self, name: &str, target: Option<FormKind>) -> Option<Tag> {
        match self.insert_tag(name, target) {
            Ok(tag) => tag,
            Err(e) => {
                self.report(e, messages::CREATE_TAG_FAILED, "Error creating tag");
                None
            }
        }
    }

    fn insert_tag(
        &mut self,
        name: &str,
        target: Option<FormKind>,
    ) -> Result<Option<Tag>, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let tag = self.api.create_tag(name)?;
        info!(tag_id = tag.id, name = %tag.name, "Created tag");
        let _ = self.fetch_tags();
        if let Some(kind) = target {
            self.form_mut(kind).selection.select(tag.id);
        }
        Ok(Some(tag))
    }

    /// Deletes a tag after confirmation and drops it from both form selections.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_tag(&mut self, tag_id: TagId) -> Result<Outcome, ApiError> {
        if !self.confirm.confirm(messages::CONFIRM_DELETE_TAG) {
            debug!(tag_id, "Tag deletion declined");
            return Ok(Outcome::Skipped);
        }
        match self.api.delete_tag(tag_id) {
            Ok(()) => {
                info!(tag_id, "Deleted tag");
                let _ = self.fetch_tags();
                self.create_form.selection.deselect(tag_id);
                self.edit_form.selection.deselect(tag_id);
                if self.filter_tag_id == Some(tag_id) {
                    self.set_filter(None);
                }
                self.banners.set_success(messages::TAG_DELETED);
                // server removed the tag from every note
                self.refetch_notes();
                Ok(Outcome::Applied)
            }
            Err(e) => Err(self.report(e, messages::DELETE_TAG_FAILED, "Error deleting tag")),
        }
    }

    /// Submits the create form. Blank title or content is a no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn create_note(&mut self) -> Result<Outcome, ApiError> {
        if !self.create_form.is_submittable() {
            return Ok(Outcome::Skipped);
        }
        self.loading = true;
        self.banners.clear();
        let result = self.submit_create();
        self.loading = false;
        result
    }

    fn submit_create(&mut self) -> Result<Outcome, ApiError> {
        let payload = self.build_payload(FormKind::Create);
        match self.api.create_note(&payload) {
            Ok(note) => {
                info!(note_id = note.id, tags = ?payload.tags, "Created note");
                self.create_form.clear();
                self.banners.set_success(messages::NOTE_CREATED);
                self.refetch_notes();
                Ok(Outcome::Applied)
            }
            Err(e) => Err(self.report(e, messages::CREATE_NOTE_FAILED, "Error creating note")),
        }
    }

    /// Archives a note of the active list through the toggle endpoint.
    ///
    /// Ids not present in the active list are skipped, so a stale id cannot
    /// flip an archived note back to active.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle_archive(&mut self, id: NoteId) -> Result<Outcome, ApiError> {
        if !self.all_notes.iter().any(|n| n.id == id) {
            warn!(note_id = id, "Note is not in the active list, not archiving");
            return Ok(Outcome::Skipped);
        }
        self.banners.dismiss_error();
        match self.api.toggle_archive(id) {
            Ok(note) => {
                if !note.archived {
                    warn!(note_id = id, "Server reports note still active after archive toggle");
                }
                info!(note_id = id, "Archived note");
                self.banners.set_success(messages::NOTE_ARCHIVED);
                self.refetch_notes();
                Ok(Outcome::Applied)
            }
            Err(e) => Err(self.report(e, messages::ARCHIVE_NOTE_FAILED, "Error archiving note")),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete_note(&mut self, id: NoteId) -> Result<Outcome, ApiError> {
        if !self.confirm.confirm(messages::CONFIRM_DELETE_NOTE) {
            debug!(note_id = id, "Note deletion declined");
            return Ok(Outcome::Skipped);
        }
        self.banners.dismiss_error();
        match self.api.delete_note(id) {
            Ok(()) => {
                info!(note_id = id, "Deleted note");
                self.banners.set_success(messages::NOTE_DELETED);
                self.refetch_notes();
                Ok(Outcome::Applied)
            }
            Err(e) => Err(self.report(e, messages::DELETE_NOTE_FAILED, "Error deleting note")),
        }
    }

    /// Opens the edit modal populated from `note`.
    pub fn start_edit(&mut self, note: &Note) {
        debug!(note_id = note.id, "Starting edit");
        self.editing = Some(note.id);
        self.edit_form = NoteForm::from_note(note);
    }

    /// Opens the edit modal for a note of the active list.
    pub fn start_edit_by_id(&mut self, id: NoteId) -> Result<(), DomainError> {
        let note = self
            .all_notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(DomainError::NoteNotFound(id))?;
        self.start_edit(&note);
        Ok(())
    }

    /// Closes the modal and discards its fields. No request is made.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.edit_form.clear();
    }

    /// Submits the edit modal. No-op when nothing is being edited or the
    /// title or content is blank. The modal stays open on failure.
    #[instrument(level = "debug", skip(self))]
    pub fn save_edit(&mut self) -> Result<Outcome, ApiError> {
        let Some(id) = self.editing else {
            return Ok(Outcome::Skipped);
        };
        if !self.edit_form.is_submittable() {
            return Ok(Outcome::Skipped);
        }
        self.loading = true;
        self.banners.clear();
        let result = self.submit_edit(id);
        self.loading = false;
        result
    }

    fn submit_edit(&mut self, id: NoteId) -> Result<Outcome, ApiError> {
        let payload = self.build_payload(FormKind::Edit);
        match self.api.update_note(id, &payload) {
            Ok(_) => {
                info!(note_id = id, tags = ?payload.tags, "Updated note");
                self.banners.set_success(messages::NOTE_UPDATED);
                self.cancel_edit();
                self.refetch_notes();
                Ok(Outcome::Applied)
            }
            Err(e) => Err(self.report(e, messages::UPDATE_NOTE_FAILED, "Error updating note")),
        }
    }

    /// Resolves the form's tag selection to names, creating the pending new
    /// tag first when one was typed.
    fn build_payload(&mut self, kind: FormKind) -> NotePayload {
        let mut tag_names = self.form(kind).selection.resolve_names(&self.tags);
        if let Some(pending) = self.form(kind).pending_tag_name().map(str::to_owned) {
            // pending tag failure is logged only
            match self.insert_tag(&pending, Some(kind)) {
                Ok(Some(tag)) => tag_names.push(tag.name),
                Ok(None) => {}
                Err(e) => error!(error = %e, name = %pending, "Error creating pending tag"),
            }
            self.form_mut(kind).new_tag_name.clear();
        }
        let form = self.form(kind);
        NotePayload {
            title: form.title.clone(),
            content: form.content.clone(),
            tags: tag_names,
        }
    }

    fn set_all_notes(&mut self, notes: Vec<Note>) {
        self.all_notes = notes;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.notes = filter_by_tag(&self.all_notes, self.filter_tag_id);
    }

    fn refetch_notes(&mut self) {
        // failure is already on the error banner
        let _ = self.fetch_notes();
    }

    fn report(&mut self, e: ApiError, fallback: &str, context: &str) -> ApiError {
        error!(error = %e, "{context}");
        self.banners.set_error(e.display_message(fallback));
        e
    }
}
