use std::fmt;

/// Opaque identifier handed out by the registry. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u64);

impl FileId {
    /// Rebuilds an id from its raw value, e.g. when an engine event names it.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value, for logging and display keys.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Metadata of a candidate file as reported by the picker or drop target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub media_type: String,
    pub size_bytes: u64,
}

impl FileRef {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size_bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileStatus {
    #[default]
    Uploading,
    Completed,
    Error,
}

impl FileStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, FileStatus::Uploading)
    }
}

/// Tracked record for one accepted file.
///
/// Fields are only mutated through [`crate::FileRegistry`], which keeps
/// `progress == 100` and `status == Completed` in lockstep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    id: FileId,
    file: FileRef,
    progress: u8,
    status: FileStatus,
}

impl FileEntry {
    pub(crate) fn new(id: FileId, file: FileRef) -> Self {
        Self {
            id,
            file,
            progress: 0,
            status: FileStatus::Uploading,
        }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn file(&self) -> &FileRef {
        &self.file
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn status(&self) -> FileStatus {
        self.status
    }

    pub(crate) fn set_progress(&mut self, progress: u8) {
        self.progress = progress;
    }

    pub(crate) fn set_status(&mut self, status: FileStatus) {
        self.status = status;
    }
}
