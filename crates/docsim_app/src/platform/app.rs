use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::Context;
use docsim_core::{
    update, AnalysisMethod, AppState, FileId, FileRef, FileStatus, GateState, Msg,
};
use docsim_logging::{set_sim_tick, sim_info, sim_warn};

use super::cli::{parse_file_arg, Cli};
use super::config::load_config;
use super::effects::EffectRunner;
use super::ui::render::{render, render_notice};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How a scripted run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Analyzed(AnalysisMethod),
    AnalysisFailed(String),
    /// Analysis never started: nothing accepted, or an upload failed.
    NotAnalyzed(String),
    TimedOut,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Analyzed(_))
    }
}

pub struct RunPlan {
    pub files: Vec<FileRef>,
    pub method: AnalysisMethod,
    pub remove: Option<String>,
    pub deadline: Duration,
}

pub fn run_cli(cli: &Cli) -> anyhow::Result<RunOutcome> {
    let config = load_config(cli.config.as_deref()).context("loading configuration")?;
    let files = cli
        .files
        .iter()
        .map(|arg| parse_file_arg(arg))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let runner = EffectRunner::new(config.settings()).context("starting simulation engine")?;
    let state = AppState::with_policy(config.policy());
    let mut session = Session::new(state, runner, std::io::stdout());
    let outcome = session.run(RunPlan {
        files,
        method: cli.method,
        remove: cli.remove.clone(),
        deadline: Duration::from_secs(cli.deadline_secs),
    })?;
    sim_info!(
        "Run finished: {:?} ({} file(s) uploaded)",
        outcome,
        session.state().view().completed_count
    );
    Ok(outcome)
}

/// Message loop owning the core state. Every mutation goes through `dispatch`.
pub struct Session<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
    tick: u64,
}

impl<W: Write> Session<W> {
    pub fn new(state: AppState, runner: EffectRunner, out: W) -> Self {
        Self {
            state,
            runner,
            out,
            tick: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, msg: Msg) -> std::io::Result<()> {
        self.tick += 1;
        set_sim_tick(self.tick);

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        for notice in self.runner.enqueue(effects) {
            writeln!(self.out, "{}", render_notice(&notice))?;
        }
        if was_dirty {
            for line in render(&self.state.view()) {
                writeln!(self.out, "{line}")?;
            }
        }
        Ok(())
    }

    pub fn run(&mut self, plan: RunPlan) -> std::io::Result<RunOutcome> {
        let started = Instant::now();
        let mut pending_removal = plan.remove;

        self.dispatch(Msg::MethodSelected(plan.method))?;
        self.dispatch(Msg::FilesSelected(plan.files))?;

        loop {
            if let Some(outcome) = self.check_finished() {
                return Ok(outcome);
            }
            if self.ready_to_analyze() {
                self.dispatch(Msg::AnalyzeClicked)?;
                continue;
            }
            if started.elapsed() >= plan.deadline {
                sim_warn!(
                    "Deadline of {:?} reached with {} upload(s) still active",
                    plan.deadline,
                    self.runner.active_uploads()
                );
                return Ok(RunOutcome::TimedOut);
            }

            let Some(msg) = self.runner.poll(POLL_INTERVAL) else {
                self.dispatch(Msg::Tick)?;
                continue;
            };
            let progressed = match &msg {
                Msg::UploadProgress { file_id, .. } => Some(*file_id),
                _ => None,
            };
            self.dispatch(msg)?;

            let remove_now = match (progressed, pending_removal.as_deref()) {
                (Some(file_id), Some(name)) => self.is_uploading_named(file_id, name),
                _ => false,
            };
            if remove_now {
                if let (Some(file_id), Some(name)) = (progressed, pending_removal.take()) {
                    sim_info!("Removing {} mid-upload", name);
                    self.dispatch(Msg::RemoveClicked { file_id })?;
                }
            }
        }
    }

    fn is_uploading_named(&self, file_id: FileId, name: &str) -> bool {
        self.state
            .registry()
            .get(file_id)
            .is_some_and(|entry| {
                entry.file().name == name && entry.status() == FileStatus::Uploading
            })
    }

    fn ready_to_analyze(&self) -> bool {
        self.state.can_analyze() && *self.state.gate().state() == GateState::Idle
    }

    fn check_finished(&self) -> Option<RunOutcome> {
        match self.state.gate().state() {
            GateState::Done { method, .. } => return Some(RunOutcome::Analyzed(*method)),
            GateState::Failed { reason, .. } => {
                return Some(RunOutcome::AnalysisFailed(reason.clone()))
            }
            GateState::Running { .. } => return None,
            GateState::Idle => {}
        }

        let registry = self.state.registry();
        if registry.is_empty() {
            return Some(RunOutcome::NotAnalyzed("no files to analyze".to_string()));
        }
        let failed = registry
            .iter()
            .filter(|entry| entry.status() == FileStatus::Error)
            .count();
        let settled = registry.iter().all(|entry| entry.status().is_terminal());
        if settled && failed > 0 {
            return Some(RunOutcome::NotAnalyzed(format!("{failed} upload(s) failed")));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsim_core::{ValidationPolicy, MEDIA_PDF, MEDIA_TEXT};
    use docsim_engine::SimulationSettings;

    fn fast_settings() -> SimulationSettings {
        SimulationSettings {
            tick_interval: Duration::from_millis(5),
            increment_min: 10,
            increment_max: 30,
            analysis_duration: Duration::from_millis(20),
            ..SimulationSettings::default()
        }
    }

    fn session(settings: SimulationSettings) -> Session<Vec<u8>> {
        let runner = EffectRunner::new(settings).expect("engine");
        Session::new(
            AppState::with_policy(ValidationPolicy::default()),
            runner,
            Vec::new(),
        )
    }

    fn plan(files: Vec<FileRef>, method: AnalysisMethod) -> RunPlan {
        RunPlan {
            files,
            method,
            remove: None,
            deadline: Duration::from_secs(10),
        }
    }

    fn three_files() -> Vec<FileRef> {
        vec![
            FileRef::new("Access Control SOP v2.1.pdf", MEDIA_PDF, 1_258_291),
            FileRef::new("Password Policy SOP.pdf", MEDIA_PDF, 778_240),
            FileRef::new("notes.txt", MEDIA_TEXT, 2048),
        ]
    }

    #[test]
    fn three_files_upload_then_enhanced_analysis_completes() {
        let mut session = session(fast_settings());
        let outcome = session
            .run(plan(three_files(), AnalysisMethod::Enhanced))
            .unwrap();

        assert_eq!(outcome, RunOutcome::Analyzed(AnalysisMethod::Enhanced));
        let view = session.state().view();
        assert_eq!(view.completed_count, 3);
        assert!(view.files.iter().all(|row| row.progress == 100));

        let output = String::from_utf8(session.out.clone()).unwrap();
        assert!(output.contains("Analysis: Running (enhanced)"));
        assert!(output.contains("Analysis: Done (enhanced)"));
        assert!(output.contains("[info] Analysis complete"));
    }

    #[test]
    fn removed_file_never_reappears() {
        let settings = SimulationSettings {
            tick_interval: Duration::from_millis(10),
            increment_min: 5,
            increment_max: 5,
            ..fast_settings()
        };
        let mut session = session(settings);
        let mut run_plan = plan(three_files(), AnalysisMethod::Semantic);
        run_plan.remove = Some("notes.txt".to_string());

        let outcome = session.run(run_plan).unwrap();
        assert_eq!(outcome, RunOutcome::Analyzed(AnalysisMethod::Semantic));
        let names: Vec<_> = session
            .state()
            .view()
            .files
            .into_iter()
            .map(|row| row.name)
            .collect();
        assert_eq!(
            names,
            vec!["Access Control SOP v2.1.pdf", "Password Policy SOP.pdf"]
        );
        assert_eq!(session.runner.active_uploads(), 0);
    }

    #[test]
    fn injected_upload_fault_blocks_analysis() {
        let settings = SimulationSettings {
            fail_marker: Some("Password".to_string()),
            ..fast_settings()
        };
        let mut session = session(settings);
        let outcome = session
            .run(plan(three_files(), AnalysisMethod::Enhanced))
            .unwrap();
        assert_eq!(
            outcome,
            RunOutcome::NotAnalyzed("1 upload(s) failed".to_string())
        );
        assert_eq!(*session.state().gate().state(), GateState::Idle);
    }

    #[test]
    fn injected_analysis_fault_is_reported() {
        let settings = SimulationSettings {
            analysis_fault: Some("model cache missing".to_string()),
            ..fast_settings()
        };
        let mut session = session(settings);
        let outcome = session
            .run(plan(three_files(), AnalysisMethod::Semantic))
            .unwrap();
        assert_eq!(
            outcome,
            RunOutcome::AnalysisFailed("model cache missing".to_string())
        );
    }

    #[test]
    fn all_rejected_files_end_without_analysis() {
        let mut session = session(fast_settings());
        let outcome = session
            .run(plan(
                vec![FileRef::new("huge.pdf", MEDIA_PDF, 20 * 1024 * 1024)],
                AnalysisMethod::Enhanced,
            ))
            .unwrap();
        assert_eq!(
            outcome,
            RunOutcome::NotAnalyzed("no files to analyze".to_string())
        );
        let output = String::from_utf8(session.out.clone()).unwrap();
        assert!(output.contains("[warn] Invalid files: 1 file(s) skipped"));
    }
}
