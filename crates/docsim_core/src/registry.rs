use std::collections::BTreeMap;

use crate::{FileEntry, FileId, FileRef, FileStatus};

pub const PROGRESS_COMPLETE: u8 = 100;

/// Result of applying one simulator tick to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// Progress moved forward; entry still uploading.
    Advanced(u8),
    /// Entry reached 100 and is now `Completed`.
    Completed,
    /// Value was not ahead of the stored progress.
    Unchanged,
    /// Entry already terminal; tick dropped.
    Terminal,
    /// No entry with that id (never registered, or removed).
    Unknown,
}

/// Ordered store of tracked files.
///
/// Ids come from a monotonic counter, so key order is insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRegistry {
    entries: BTreeMap<FileId, FileEntry>,
    next_id: u64,
}

impl Default for FileRegistry {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, files: Vec<FileRef>) -> Vec<FileEntry> {
        let mut added = Vec::with_capacity(files.len());
        for file in files {
            let id = FileId::from_raw(self.next_id);
            self.next_id += 1;
            let entry = FileEntry::new(id, file);
            self.entries.insert(id, entry.clone());
            added.push(entry);
        }
        added
    }

    /// Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: FileId) -> Option<FileEntry> {
        self.entries.remove(&id)
    }

    pub fn get(&self, id: FileId) -> Option<&FileEntry> {
        self.entries.get(&id)
    }

    pub fn list(&self) -> Vec<&FileEntry> {
        self.entries.values().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Applies an absolute progress value reported for `id`.
    pub fn apply_progress(&mut self, id: FileId, value: u8) -> ProgressOutcome {
        let Some(entry) = self.entries.get_mut(&id) else {
            return ProgressOutcome::Unknown;
        };
        if entry.status().is_terminal() {
            return ProgressOutcome::Terminal;
        }
        let value = value.min(PROGRESS_COMPLETE);
        if value <= entry.progress() {
            return ProgressOutcome::Unchanged;
        }
        entry.set_progress(value);
        if value == PROGRESS_COMPLETE {
            entry.set_status(FileStatus::Completed);
            ProgressOutcome::Completed
        } else {
            ProgressOutcome::Advanced(value)
        }
    }

    /// Moves an uploading entry to `Error`. Returns false if nothing changed.
    pub fn mark_failed(&mut self, id: FileId) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) if entry.status() == FileStatus::Uploading => {
                entry.set_status(FileStatus::Error);
                true
            }
            _ => false,
        }
    }
}
