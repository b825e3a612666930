// src/application/tag_selection.rs
use crate::domain::{Note, Tag, TagId};

/// Which of the two note forms an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Create,
    Edit,
}

/// Ordered set of tag ids picked in a note form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSelection {
    ids: Vec<TagId>,
}

impl TagSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = TagId>) -> Self {
        let mut selection = Self::new();
        for id in ids {
            selection.select(id);
        }
        selection
    }

    pub fn ids(&self) -> &[TagId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: TagId) -> bool {
        self.ids.contains(&id)
    }

    /// Appends `id` unless already selected.
    pub fn select(&mut self, id: TagId) {
        if !self.contains(id) {
            self.ids.push(id);
        }
    }

    pub fn deselect(&mut self, id: TagId) {
        self.ids.retain(|&selected| selected != id);
    }

    pub fn toggle(&mut self, id: TagId) {
        if self.contains(id) {
            self.deselect(id);
        } else {
            self.select(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Maps selected ids to tag names through `tags`.
    ///
    /// Ids without a matching tag (deleted meanwhile) are dropped silently.
    pub fn resolve_names(&self, tags: &[Tag]) -> Vec<String> {
        self.ids
            .iter()
            .filter_map(|id| tags.iter().find(|t| t.id == *id))
            .map(|t| t.name.clone())
            .collect()
    }
}

/// Field state of the create form or the edit modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
    pub selection: TagSelection,
    /// Free text for a tag to create on submit.
    pub new_tag_name: String,
}

impl NoteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            selection: TagSelection::from_ids(note.tag_ids()),
            new_tag_name: String::new(),
        }
    }

    /// Title and content are both non-blank.
    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }

    /// Pending new tag name, trimmed, if any.
    pub fn pending_tag_name(&self) -> Option<&str> {
        let name = self.new_tag_name.trim();
        (!name.is_empty()).then_some(name)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
