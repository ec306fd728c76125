use crate::{AnalysisMethod, FileId, FileStatus, GateState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntakeStats {
    pub accepted: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub files: Vec<FileRowView>,
    pub file_count: usize,
    pub completed_count: usize,
    pub can_analyze: bool,
    pub method: AnalysisMethod,
    pub analysis: GateState,
    pub last_intake: Option<IntakeStats>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub file_id: FileId,
    pub name: String,
    pub media_type: String,
    pub size_bytes: u64,
    pub progress: u8,
    pub status: FileStatus,
}
