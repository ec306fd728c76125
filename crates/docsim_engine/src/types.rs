use std::fmt;

use thiserror::Error;

pub type FileId = u64;
pub type RunId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Enhanced,
    Semantic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file_id: FileId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub file_id: FileId,
    /// Absolute percentage, 0..=100, non-decreasing per file.
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(UploadProgress),
    UploadFinished {
        file_id: FileId,
        result: Result<(), TransferError>,
    },
    AnalysisFinished {
        run: RunId,
        result: Result<AnalysisKind, String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransferError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransferError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Cancelled,
    Injected { at_progress: u8 },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Injected { at_progress } => {
                write!(f, "injected fault at {at_progress}%")
            }
        }
    }
}
