use crate::{AnalysisMethod, FileId, RunId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartUpload { file_id: FileId, name: String },
    CancelUpload { file_id: FileId },
    RunAnalysis { run: RunId, method: AnalysisMethod },
    Notify(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Toast-style message for the notification surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub text: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn warning(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            text: text.into(),
        }
    }
}
