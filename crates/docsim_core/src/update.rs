use crate::registry::ProgressOutcome;
use crate::validation::ValidationError;
use crate::{AppState, Effect, FileRef, FileStatus, GateState, Msg, Notice};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSelected(files) => {
            if files.is_empty() {
                return (state, Vec::new());
            }
            let intake = state.policy().partition(files);
            let skipped = intake.rejected.len();
            let added = state.registry_mut().register(intake.accepted);
            state.set_last_intake(added.len(), skipped);
            state.mark_dirty();

            let mut effects = Vec::with_capacity(added.len() + 2);
            if skipped > 0 {
                effects.push(Effect::Notify(Notice::warning(
                    "Invalid files",
                    skipped_summary(&intake.rejected),
                )));
            }
            if !added.is_empty() {
                effects.push(Effect::Notify(Notice::info(
                    "Files added",
                    format!("{} file(s) added successfully.", added.len()),
                )));
            }
            for entry in added {
                effects.push(Effect::StartUpload {
                    file_id: entry.id(),
                    name: entry.file().name.clone(),
                });
            }
            effects
        }
        Msg::RemoveClicked { file_id } => match state.registry_mut().remove(file_id) {
            Some(entry) => {
                state.mark_dirty();
                if entry.status() == FileStatus::Uploading {
                    vec![Effect::CancelUpload { file_id }]
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        },
        Msg::MethodSelected(method) => {
            if state.set_method(method) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::AnalyzeClicked => match state.begin_analysis() {
            Ok(run) => {
                state.mark_dirty();
                vec![Effect::RunAnalysis {
                    run,
                    method: state.method(),
                }]
            }
            Err(err) => vec![Effect::Notify(Notice::warning(
                "Analysis unavailable",
                err.to_string(),
            ))],
        },
        Msg::ResetAnalysisClicked => match state.gate_mut().reset() {
            Ok(()) => {
                state.mark_dirty();
                Vec::new()
            }
            Err(err) => vec![Effect::Notify(Notice::warning(
                "Reset unavailable",
                err.to_string(),
            ))],
        },
        Msg::UploadProgress { file_id, progress } => {
            match state.registry_mut().apply_progress(file_id, progress) {
                ProgressOutcome::Advanced(_) => {
                    state.mark_dirty();
                    Vec::new()
                }
                ProgressOutcome::Completed => {
                    state.mark_dirty();
                    let name = file_name(&state, file_id);
                    vec![Effect::Notify(Notice::info(
                        "Upload complete",
                        format!("{name} uploaded successfully."),
                    ))]
                }
                ProgressOutcome::Unchanged
                | ProgressOutcome::Terminal
                | ProgressOutcome::Unknown => Vec::new(),
            }
        }
        Msg::UploadFailed { file_id, reason } => {
            if state.registry_mut().mark_failed(file_id) {
                state.mark_dirty();
                let name = file_name(&state, file_id);
                vec![Effect::Notify(Notice::warning(
                    "Upload failed",
                    format!("{name}: {reason}"),
                ))]
            } else {
                Vec::new()
            }
        }
        Msg::AnalysisFinished { run, result } => {
            let applied = match result {
                Ok(()) => state.gate_mut().complete(run),
                Err(reason) => state.gate_mut().fail(run, reason),
            };
            if applied {
                state.mark_dirty();
                vec![Effect::Notify(analysis_notice(state.gate().state()))]
            } else {
                Vec::new()
            }
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn skipped_summary(rejected: &[(FileRef, ValidationError)]) -> String {
    let details = rejected
        .iter()
        .map(|(file, err)| format!("{} ({err})", file.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} file(s) skipped. Only PDF, Word and plain-text documents are accepted: {details}",
        rejected.len()
    )
}

fn file_name(state: &AppState, file_id: crate::FileId) -> String {
    state
        .registry()
        .get(file_id)
        .map(|entry| entry.file().name.clone())
        .unwrap_or_else(|| file_id.to_string())
}

fn analysis_notice(gate: &GateState) -> Notice {
    match gate {
        GateState::Done { method, .. } => {
            Notice::info("Analysis complete", format!("{method} analysis finished."))
        }
        GateState::Failed { method, reason, .. } => Notice::warning(
            "Analysis failed",
            format!("{method} analysis failed: {reason}"),
        ),
        GateState::Idle | GateState::Running { .. } => {
            Notice::info("Analysis", "analysis state changed")
        }
    }
}
