use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{FileEntry, FileStatus};

/// Identifies one accepted analysis run; stale completions are matched against it.
pub type RunId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMethod {
    #[default]
    Enhanced,
    Semantic,
}

impl AnalysisMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisMethod::Enhanced => "enhanced",
            AnalysisMethod::Semantic => "semantic",
        }
    }
}

impl fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid analysis method {0:?}; expected one of: enhanced, semantic")]
pub struct ParseMethodError(pub String);

impl FromStr for AnalysisMethod {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enhanced" => Ok(AnalysisMethod::Enhanced),
            "semantic" => Ok(AnalysisMethod::Semantic),
            other => Err(ParseMethodError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Idle,
    Running {
        run: RunId,
        method: AnalysisMethod,
    },
    Done {
        run: RunId,
        method: AnalysisMethod,
    },
    Failed {
        run: RunId,
        method: AnalysisMethod,
        reason: String,
    },
}

impl GateState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GateState::Done { .. } | GateState::Failed { .. })
    }
}

/// A rejected gate action. Rejection never changes gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("analysis is already running")]
    AlreadyRunning,
    #[error("all files must finish uploading before analysis")]
    NotReady,
    #[error("previous analysis result must be reset first")]
    AlreadyFinished,
}

/// True iff there is at least one entry and every entry is `Completed`.
pub fn can_analyze<'a>(entries: impl IntoIterator<Item = &'a FileEntry>) -> bool {
    let mut any = false;
    for entry in entries {
        if entry.status() != FileStatus::Completed {
            return false;
        }
        any = true;
    }
    any
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisGate {
    state: GateState,
    last_run: RunId,
}

impl AnalysisGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn begin<'a>(
        &mut self,
        method: AnalysisMethod,
        entries: impl IntoIterator<Item = &'a FileEntry>,
    ) -> Result<RunId, GateError> {
        match self.state {
            GateState::Running { .. } => return Err(GateError::AlreadyRunning),
            GateState::Done { .. } | GateState::Failed { .. } => {
                return Err(GateError::AlreadyFinished)
            }
            GateState::Idle => {}
        }
        if !can_analyze(entries) {
            return Err(GateError::NotReady);
        }
        self.last_run += 1;
        let run = self.last_run;
        self.state = GateState::Running { run, method };
        Ok(run)
    }

    /// Returns false if `run` is not the running analysis.
    pub fn complete(&mut self, run: RunId) -> bool {
        match self.state {
            GateState::Running {
                run: current,
                method,
            } if current == run => {
                self.state = GateState::Done { run, method };
                true
            }
            _ => false,
        }
    }

    /// Returns false if `run` is not the running analysis.
    pub fn fail(&mut self, run: RunId, reason: impl Into<String>) -> bool {
        match self.state {
            GateState::Running {
                run: current,
                method,
            } if current == run => {
                self.state = GateState::Failed {
                    run,
                    method,
                    reason: reason.into(),
                };
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) -> Result<(), GateError> {
        if let GateState::Running { .. } = self.state {
            return Err(GateError::AlreadyRunning);
        }
        self.state = GateState::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileRef, FileRegistry};

    fn registry_with(statuses: &[Option<u8>]) -> FileRegistry {
        let mut registry = FileRegistry::new();
        let files = statuses
            .iter()
            .enumerate()
            .map(|(i, _)| FileRef::new(format!("{i}.pdf"), "application/pdf", 10))
            .collect();
        let entries = registry.register(files);
        for (entry, progress) in entries.iter().zip(statuses) {
            if let Some(progress) = progress {
                registry.apply_progress(entry.id(), *progress);
            }
        }
        registry
    }

    #[test]
    fn empty_registry_cannot_analyze() {
        assert!(!can_analyze(FileRegistry::new().iter()));
    }

    #[test]
    fn mixed_statuses_cannot_analyze() {
        let registry = registry_with(&[Some(100), Some(40)]);
        assert!(!can_analyze(registry.iter()));
        let registry = registry_with(&[Some(100), Some(100)]);
        assert!(can_analyze(registry.iter()));
    }

    #[test]
    fn failed_entry_blocks_analysis() {
        let mut registry = registry_with(&[Some(100), None]);
        let id = registry.iter().nth(1).unwrap().id();
        registry.mark_failed(id);
        assert!(!can_analyze(registry.iter()));
    }

    #[test]
    fn second_begin_is_rejected_while_running() {
        let registry = registry_with(&[Some(100)]);
        let mut gate = AnalysisGate::new();
        let run = gate.begin(AnalysisMethod::Enhanced, registry.iter()).unwrap();
        let before = gate.clone();

        assert_eq!(
            gate.begin(AnalysisMethod::Semantic, registry.iter()),
            Err(GateError::AlreadyRunning)
        );
        assert_eq!(gate, before);

        assert!(gate.complete(run));
        assert!(!gate.complete(run));
        assert_eq!(
            gate.state(),
            &GateState::Done {
                run,
                method: AnalysisMethod::Enhanced
            }
        );
    }

    #[test]
    fn not_ready_leaves_gate_idle() {
        let registry = registry_with(&[Some(10)]);
        let mut gate = AnalysisGate::new();
        assert_eq!(
            gate.begin(AnalysisMethod::Enhanced, registry.iter()),
            Err(GateError::NotReady)
        );
        assert_eq!(gate.state(), &GateState::Idle);
    }

    #[test]
    fn terminal_states_require_reset() {
        let registry = registry_with(&[Some(100)]);
        let mut gate = AnalysisGate::new();
        let run = gate.begin(AnalysisMethod::Semantic, registry.iter()).unwrap();
        assert_eq!(gate.reset(), Err(GateError::AlreadyRunning));
        assert!(gate.fail(run, "injected"));
        assert!(gate.state().is_terminal());
        assert_eq!(
            gate.begin(AnalysisMethod::Semantic, registry.iter()),
            Err(GateError::AlreadyFinished)
        );

        gate.reset().unwrap();
        let next = gate.begin(AnalysisMethod::Semantic, registry.iter()).unwrap();
        assert_ne!(next, run);
        assert!(!gate.complete(run), "stale run id must be ignored");
    }

    #[test]
    fn method_parses_known_names_only() {
        assert_eq!(
            "enhanced".parse::<AnalysisMethod>(),
            Ok(AnalysisMethod::Enhanced)
        );
        assert_eq!(
            "semantic".parse::<AnalysisMethod>(),
            Ok(AnalysisMethod::Semantic)
        );
        assert!("keyword".parse::<AnalysisMethod>().is_err());
        assert_eq!(
            " semantic ".parse::<AnalysisMethod>(),
            Err(ParseMethodError(" semantic ".to_string()))
        );
        assert!("Enhanced".parse::<AnalysisMethod>().is_err());
    }
}
