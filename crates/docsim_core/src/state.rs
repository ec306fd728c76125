use crate::gate::{can_analyze, AnalysisGate, AnalysisMethod, GateError, RunId};
use crate::registry::FileRegistry;
use crate::validation::ValidationPolicy;
use crate::view_model::{AppViewModel, FileRowView, IntakeStats};
use crate::FileStatus;

/// Owned store for the upload workflow. Mutated only through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    registry: FileRegistry,
    policy: ValidationPolicy,
    gate: AnalysisGate,
    method: AnalysisMethod,
    last_intake: Option<IntakeStats>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    pub fn gate(&self) -> &AnalysisGate {
        &self.gate
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn method(&self) -> AnalysisMethod {
        self.method
    }

    pub fn can_analyze(&self) -> bool {
        can_analyze(self.registry.iter())
    }

    pub fn view(&self) -> AppViewModel {
        let files: Vec<FileRowView> = self
            .registry
            .iter()
            .map(|entry| FileRowView {
                file_id: entry.id(),
                name: entry.file().name.clone(),
                media_type: entry.file().media_type.clone(),
                size_bytes: entry.file().size_bytes,
                progress: entry.progress(),
                status: entry.status(),
            })
            .collect();
        let completed_count = files
            .iter()
            .filter(|row| row.status == FileStatus::Completed)
            .count();
        AppViewModel {
            file_count: files.len(),
            completed_count,
            files,
            can_analyze: self.can_analyze(),
            method: self.method,
            analysis: self.gate.state().clone(),
            last_intake: self.last_intake,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn registry_mut(&mut self) -> &mut FileRegistry {
        &mut self.registry
    }

    pub(crate) fn gate_mut(&mut self) -> &mut AnalysisGate {
        &mut self.gate
    }

    pub(crate) fn set_method(&mut self, method: AnalysisMethod) -> bool {
        if self.method == method {
            return false;
        }
        self.method = method;
        true
    }

    pub(crate) fn set_last_intake(&mut self, accepted: usize, skipped: usize) {
        self.last_intake = Some(IntakeStats { accepted, skipped });
    }

    pub(crate) fn begin_analysis(&mut self) -> Result<RunId, GateError> {
        let method = self.method;
        self.gate.begin(method, self.registry.iter())
    }
}
