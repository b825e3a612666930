// src/application/archived_view.rs
use crate::application::{Banners, Confirm, NotesApi, Outcome};
use crate::constants::messages;
use crate::domain::{ApiError, Note, NoteId};
use tracing::{debug, error, info, instrument, warn};

/// Controller of the archived-notes view: restore or delete for good.
pub struct ArchivedView<A: NotesApi, C: Confirm> {
    api: A,
    confirm: C,
    notes: Vec<Note>,
    banners: Banners,
}

impl<A: NotesApi, C: Confirm> ArchivedView<A, C> {
    pub fn new(api: A, confirm: C) -> Self {
        Self {
            api,
            confirm,
            notes: Vec::new(),
            banners: Banners::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn banners(&self) -> &Banners {
        &self.banners
    }

    #[instrument(level = "debug", skip(self))]
    pub fn fetch_archived(&mut self) -> Result<(), ApiError> {
        self.banners.dismiss_error();
        match self.api.archived_notes() {
            Ok(notes) => {
                debug!(count = notes.len(), "Fetched archived notes");
                self.notes = notes;
                Ok(())
            }
            Err(e) => Err(self.report(
                e,
                messages::LOAD_ARCHIVED_FAILED,
                "Error fetching archived notes",
            )),
        }
    }

    /// Restores an archived note through the toggle endpoint.
    ///
    /// Only ids present in the archived list are toggled.
    #[instrument(level = "debug", skip(self))]
    pub fn unarchive(&mut self, id: NoteId) -> Result<Outcome, ApiError> {
        if !self.notes.iter().any(|n| n.id == id) {
            warn!(note_id = id, "Note is not in the archived list, not restoring");
            return Ok(Outcome::Skipped);
        }
        self.banners.dismiss_error();
        match self.api.toggle_archive(id) {
            Ok(note) => {
                if note.archived {
                    warn!(note_id = id, "Server reports note still archived after toggle");
                }
                info!(note_id = id, "Restored note");
                self.banners.set_success(messages::NOTE_RESTORED);
                self.refetch();
                Ok(Outcome::Applied)
            }
            Err(e) => Err(self.report(e, messages::RESTORE_NOTE_FAILED, "Error unarchiving note")),
        }
    }

    /// Permanently deletes a note after confirmation.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_note(&mut self, id: NoteId) -> Result<Outcome, ApiError> {
        if !self.confirm.confirm(messages::CONFIRM_PURGE_NOTE) {
            debug!(note_id = id, "Permanent deletion declined");
            return Ok(Outcome::Skipped);
        }
        self.banners.dismiss_error();
        match self.api.delete_note(id) {
            Ok(()) => {
                info!(note_id = id, "Deleted note permanently");
                self.banners.set_success(messages::NOTE_DELETED_PERMANENTLY);
                self.refetch();
                Ok(Outcome::Applied)
            }
            Err(e) => Err(self.report(e, messages::DELETE_NOTE_FAILED, "Error deleting note")),
        }
    }

    fn refetch(&mut self) {
        let _ = self.fetch_archived();
    }

    fn report(&mut self, e: ApiError, fallback: &str, context: &str) -> ApiError {
        error!(error = %e, "{context}");
        self.banners.set_error(e.display_message(fallback));
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{always_confirm, never_confirm, note, ApiCall, Endpoint, MockNotesApi};

    #[test]
    fn given_archived_notes_when_fetching_then_listed() {
        let api = MockNotesApi::builder()
            .with_note(note(1, "active", &[]))
            .with_archived_note(note(2, "old", &[]))
            .build();
        let mut view = ArchivedView::new(api, always_confirm);

        view.fetch_archived().unwrap();

        assert_eq!(view.notes().len(), 1);
        assert_eq!(view.notes()[0].id, 2);
    }

    #[test]
    fn given_fetch_failure_without_message_when_fetching_then_fallback_shown() {
        let api = MockNotesApi::builder()
            .with_failure(Endpoint::ArchivedNotes, ApiError::Transport { message: None })
            .build();
        let mut view = ArchivedView::new(api, always_confirm);

        assert!(view.fetch_archived().is_err());
        assert_eq!(view.banners().error(), Some("Failed to load archived notes"));
    }

    #[test]
    fn given_archived_note_when_unarchiving_then_moves_back_to_active() {
        // Arrange
        let api = MockNotesApi::builder()
            .with_archived_note(note(2, "old", &[]))
            .build();
        let mut view = ArchivedView::new(api, always_confirm);
        view.fetch_archived().unwrap();

        // Act
        let outcome = view.unarchive(2).unwrap();

        // Assert
        assert_eq!(outcome, Outcome::Applied);
        assert!(view.notes().is_empty());
        assert_eq!(view.api_mut().active_notes().unwrap()[0].id, 2);
        assert_eq!(view.banners().success(), Some("Note restored successfully!"));
    }

    #[test]
    fn given_id_not_in_archive_when_unarchiving_then_skipped() {
        let api = MockNotesApi::builder()
            .with_note(note(1, "active", &[]))
            .build();
        let mut view = ArchivedView::new(api, always_confirm);
        view.fetch_archived().unwrap();

        assert_eq!(view.unarchive(1).unwrap(), Outcome::Skipped);
        assert_eq!(view.api().calls(), &[ApiCall::ArchivedNotes]);
    }

    #[test]
    fn given_confirmation_when_deleting_then_removed_permanently() {
        let api = MockNotesApi::builder()
            .with_archived_note(note(2, "old", &[]))
            .build();
        let mut view = ArchivedView::new(api, always_confirm);
        view.fetch_archived().unwrap();

        let outcome = view.delete_note(2).unwrap();

        assert_eq!(outcome, Outcome::Applied);
        assert!(view.notes().is_empty());
        assert_eq!(view.banners().success(), Some("Note deleted permanently!"));
    }

    #[test]
    fn given_declined_confirmation_when_deleting_then_nothing_sent() {
        let api = MockNotesApi::builder()
            .with_archived_note(note(2, "old", &[]))
            .build();
        let mut view = ArchivedView::new(api, never_confirm);

        assert_eq!(view.delete_note(2).unwrap(), Outcome::Skipped);
        assert!(view.api().calls().is_empty());
    }

    #[test]
    fn given_delete_failure_when_deleting_then_error_banner() {
        let api = MockNotesApi::builder()
            .with_archived_note(note(2, "old", &[]))
            .with_failure(
                Endpoint::DeleteNote,
                ApiError::Status {
                    status: 400,
                    message: Some("Note not found".to_string()),
                    code: None,
                },
            )
            .build();
        let mut view = ArchivedView::new(api, always_confirm);
        view.fetch_archived().unwrap();

        assert!(view.delete_note(2).is_err());
        assert_eq!(view.banners().error(), Some("Note not found"));
        assert_eq!(view.notes().len(), 1);
    }
}
