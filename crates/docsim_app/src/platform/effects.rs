use std::time::Duration;

use docsim_core::{AnalysisMethod, Effect, FileId, Msg, NoticeLevel};
use docsim_engine::{AnalysisKind, EngineEvent, EngineHandle, SimulationSettings};
use docsim_logging::{sim_debug, sim_info, sim_warn};

/// Executes core effects against the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: SimulationSettings) -> std::io::Result<Self> {
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    /// Forwards engine-bound effects and hands notices back to the caller.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<docsim_core::Notice> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartUpload { file_id, name } => {
                    sim_info!("StartUpload file_id={} name={}", file_id, name);
                    self.engine.start_upload(file_id.get(), name);
                }
                Effect::CancelUpload { file_id } => {
                    sim_info!("CancelUpload file_id={}", file_id);
                    self.engine.cancel_upload(file_id.get());
                }
                Effect::RunAnalysis { run, method } => {
                    sim_info!("RunAnalysis run={} method={}", run, method);
                    self.engine.run_analysis(run, map_method(method));
                }
                Effect::Notify(notice) => {
                    match notice.level {
                        NoticeLevel::Info => sim_info!("{}: {}", notice.title, notice.text),
                        NoticeLevel::Warning => sim_warn!("{}: {}", notice.title, notice.text),
                    }
                    notices.push(notice);
                }
            }
        }
        notices
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn poll(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }

    pub fn active_uploads(&self) -> usize {
        self.engine.active_uploads()
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(progress) => Msg::UploadProgress {
            file_id: FileId::from_raw(progress.file_id),
            progress: progress.progress,
        },
        EngineEvent::UploadFinished { file_id, result } => match result {
            // Idempotent: the final progress tick already carried 100.
            Ok(()) => Msg::UploadProgress {
                file_id: FileId::from_raw(file_id),
                progress: docsim_core::PROGRESS_COMPLETE,
            },
            Err(err) => Msg::UploadFailed {
                file_id: FileId::from_raw(file_id),
                reason: err.to_string(),
            },
        },
        EngineEvent::AnalysisFinished { run, result } => {
            if let Ok(kind) = &result {
                sim_debug!("Analysis run {} reported {:?}", run, kind);
            }
            Msg::AnalysisFinished {
                run,
                result: result.map(|_| ()),
            }
        }
    }
}

fn map_method(method: AnalysisMethod) -> AnalysisKind {
    match method {
        AnalysisMethod::Enhanced => AnalysisKind::Enhanced,
        AnalysisMethod::Semantic => AnalysisKind::Semantic,
    }
}
