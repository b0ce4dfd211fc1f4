use tracing::debug;

use crate::models::FileRecord;

/// Ids of the files the user has ticked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    ids: Vec<i64>,
}

impl SelectionSet {
    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    /// Remove `id` if present, otherwise append it.
    pub fn toggle(&mut self, id: i64) {
        if let Some(pos) = self.ids.iter().position(|&x| x == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    /// Append `id` unless it is already selected.
    pub fn insert(&mut self, id: i64) {
        if !self.contains(id) {
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// The loaded file list and the current selection. Rendering and export
/// read it; only `replace_files` and the selection handlers write it.
#[derive(Debug, Default)]
pub struct Session {
    files: Vec<FileRecord>,
    selection: SelectionSet,
}

impl Session {
    pub fn new(files: Vec<FileRecord>) -> Self {
        Self {
            files,
            selection: SelectionSet::default(),
        }
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Swap in a freshly fetched list. The selection starts over.
    pub fn replace_files(&mut self, files: Vec<FileRecord>) {
        self.files = files;
        self.selection.clear();
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selection.contains(id)
    }

    /// Toggle a file's checkbox. Ids that are not in the list are ignored.
    pub fn handle_file_selection(&mut self, file_id: i64) {
        if !self.files.iter().any(|f| f.id == file_id) {
            debug!(file_id, "ignoring selection of unknown file");
            return;
        }
        self.selection.toggle(file_id);
    }

    /// Select everything, or clear the selection when everything is already
    /// selected.
    pub fn toggle_all(&mut self) {
        let all_selected = self.files.iter().all(|f| self.selection.contains(f.id));
        self.selection.clear();
        if !all_selected {
            for f in &self.files {
                self.selection.insert(f.id);
            }
        }
    }

    /// Selected files in file-list order.
    pub fn selected_files(&self) -> impl Iterator<Item = &FileRecord> {
        self.files
            .iter()
            .filter(|f| self.selection.contains(f.id))
    }
}
