use crate::models::{Folder, Note};
use leptos::prelude::*;

/// Note shown in the preview modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Preview {
    pub note_id: String,
    pub title: String,
    pub url: String,
}

impl From<&Note> for Preview {
    fn from(note: &Note) -> Self {
        Self {
            note_id: note.id.clone(),
            title: note.title.clone(),
            url: note.file_url.clone(),
        }
    }
}

/// Identifies one note-list fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NotesTicket {
    folder_id: String,
    request_id: u64,
}

impl NotesTicket {
    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }
}

/// Dashboard navigation: the open folder, the previewed note and the
/// latest note-list request.
///
/// Only the most recent ticket for the folder still open is current; every
/// other response is dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FolderView {
    open: Option<Folder>,
    preview: Option<Preview>,
    latest_request: u64,
}

impl FolderView {
    pub fn open_folder(&self) -> Option<&Folder> {
        self.open.as_ref()
    }

    pub fn is_open(&self, folder_id: &str) -> bool {
        self.open.as_ref().is_some_and(|f| f.id == folder_id)
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn open(&mut self, folder: Folder) {
        self.open = Some(folder);
        self.preview = None;
    }

    /// Back to the folder grid.
    pub fn close(&mut self) {
        self.open = None;
        self.preview = None;
    }

    pub fn show_preview(&mut self, preview: Preview) {
        if self.open.is_some() {
            self.preview = Some(preview);
        }
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    /// Start a fetch for the open folder. Earlier tickets stop being current.
    pub fn begin_notes_request(&mut self) -> Option<NotesTicket> {
        let folder_id = self.open.as_ref()?.id.clone();
        self.latest_request += 1;
        Some(NotesTicket {
            folder_id,
            request_id: self.latest_request,
        })
    }

    pub fn is_current(&self, ticket: &NotesTicket) -> bool {
        ticket.request_id == self.latest_request && self.is_open(&ticket.folder_id)
    }

    /// Returns `true` when the deleted folder was open; the view falls back to the grid.
    pub fn folder_deleted(&mut self, folder_id: &str) -> bool {
        if !self.is_open(folder_id) {
            return false;
        }
        self.close();
        true
    }

    /// Returns `true` when the deleted note was being previewed.
    pub fn note_deleted(&mut self, note_id: &str) -> bool {
        if !self.preview.as_ref().is_some_and(|p| p.note_id == note_id) {
            return false;
        }
        self.preview = None;
        true
    }
}

/// Whether a finished fetch may be applied. `false` once the page is gone.
pub(crate) fn accepts_notes(view: RwSignal<FolderView>, ticket: &NotesTicket) -> bool {
    view.try_with_untracked(|v| v.is_current(ticket))
        .unwrap_or(false)
}

/// Whether `folder_id` is still on screen. `false` once the page is gone.
pub(crate) fn still_open(view: RwSignal<FolderView>, folder_id: &str) -> bool {
    view.try_with_untracked(|v| v.is_open(folder_id))
        .unwrap_or(false)
}
