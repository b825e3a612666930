// src/constants.rs
//
// Application-wide constants: wire defaults, storage keys and the user-facing
// fallback strings shown when a request fails without a usable message.

use std::time::Duration;

/// Base URL used when neither the config file nor `--base-url` provides one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Key under which the session token is persisted in the storage file.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// File name of the key/value storage inside the data directory.
pub const STORAGE_FILE_NAME: &str = "storage.json";

/// File name of the TOML config inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name used below the platform config/data dirs.
pub const APP_DIR_NAME: &str = "notekeep";

/// Success banners are considered cleared this long after being set.
///
/// Used in: `application/banner.rs`
pub const SUCCESS_BANNER_TTL: Duration = Duration::from_secs(3);

/// Maximum number of characters of note content shown in list output.
///
/// Used in: `ports/text.rs`
pub const PREVIEW_WIDTH: usize = 80;

pub mod messages {
    pub const LOAD_NOTES_FAILED: &str = "Failed to load notes";
    pub const LOAD_ARCHIVED_FAILED: &str = "Failed to load archived notes";
    pub const LOAD_TAGS_FAILED: &str = "Failed to load tags";
    pub const CREATE_NOTE_FAILED: &str = "Failed to create note";
    pub const UPDATE_NOTE_FAILED: &str = "Failed to update note";
    pub const ARCHIVE_NOTE_FAILED: &str = "Failed to archive note";
    pub const RESTORE_NOTE_FAILED: &str = "Failed to restore note";
    pub const DELETE_NOTE_FAILED: &str = "Failed to delete note";
    pub const CREATE_TAG_FAILED: &str = "Failed to create tag";
    pub const DELETE_TAG_FAILED: &str = "Failed to delete tag";
    pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

    pub const NOTE_CREATED: &str = "Note created successfully!";
    pub const NOTE_UPDATED: &str = "Note updated successfully!";
    pub const NOTE_ARCHIVED: &str = "Note archived successfully!";
    pub const NOTE_RESTORED: &str = "Note restored successfully!";
    pub const NOTE_DELETED: &str = "Note deleted successfully!";
    pub const NOTE_DELETED_PERMANENTLY: &str = "Note deleted permanently!";
    pub const TAG_DELETED: &str = "Tag deleted successfully";

    pub const CONFIRM_DELETE_NOTE: &str = "Are you sure you want to delete this note?";
    pub const CONFIRM_PURGE_NOTE: &str = "Are you sure you want to permanently delete this note?";
    pub const CONFIRM_DELETE_TAG: &str =
        "Are you sure you want to delete this tag? It will be removed from all notes.";
}
