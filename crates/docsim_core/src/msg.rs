use crate::{AnalysisMethod, FileId, FileRef, RunId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked or dropped a batch of files.
    FilesSelected(Vec<FileRef>),
    /// User clicked the remove button on a file row.
    RemoveClicked { file_id: FileId },
    /// User chose an analysis method.
    MethodSelected(AnalysisMethod),
    /// User clicked Start Analysis.
    AnalyzeClicked,
    /// User dismissed a finished analysis.
    ResetAnalysisClicked,
    /// Simulator progress for a file, as an absolute percentage.
    UploadProgress { file_id: FileId, progress: u8 },
    /// Simulator gave up on a file.
    UploadFailed { file_id: FileId, reason: String },
    /// Simulated analysis finished for a run.
    AnalysisFinished {
        run: RunId,
        result: Result<(), String>,
    },
    /// Loop tick to coalesce rendering.
    Tick,
}
