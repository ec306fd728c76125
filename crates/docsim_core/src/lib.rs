//! Docsim core: pure upload/analysis state machine and view-model helpers.
mod effect;
mod file;
mod gate;
mod msg;
mod registry;
mod state;
mod update;
mod validation;
mod view_model;

pub use effect::{Effect, Notice, NoticeLevel};
pub use file::{FileEntry, FileId, FileRef, FileStatus};
pub use gate::{
    can_analyze, AnalysisGate, AnalysisMethod, GateError, GateState, ParseMethodError, RunId,
};
pub use msg::Msg;
pub use registry::{FileRegistry, ProgressOutcome, PROGRESS_COMPLETE};
pub use state::AppState;
pub use update::update;
pub use validation::{
    Intake, ValidationError, ValidationPolicy, DEFAULT_MAX_BYTES, MEDIA_DOCX, MEDIA_MSWORD,
    MEDIA_PDF, MEDIA_TEXT,
};
pub use view_model::{AppViewModel, FileRowView, IntakeStats};
