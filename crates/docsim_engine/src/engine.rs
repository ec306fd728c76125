use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use docsim_logging::{sim_debug, sim_info};

use crate::analysis::SimulatedAnalyzer;
use crate::simulator::{ChannelProgressSink, ProgressSimulator, ProgressSink, SimulatedTransport};
use crate::{AnalysisKind, EngineEvent, FileId, RunId, SimulationSettings, UploadRequest};

enum EngineCommand {
    StartUpload { file_id: FileId, name: String },
    CancelUpload { file_id: FileId },
    RunAnalysis { run: RunId, kind: AnalysisKind },
}

/// Owns the simulation runtime thread. Dropping the handle stops it.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    simulator: Arc<ProgressSimulator>,
}

impl EngineHandle {
    pub fn new(settings: SimulationSettings) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("docsim-engine")
            .enable_time()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let simulator = Arc::new(ProgressSimulator::new(Arc::new(
            SimulatedTransport::from_settings(&settings),
        )));
        let analyzer = SimulatedAnalyzer::from_settings(&settings);
        let sink = ChannelProgressSink::new(event_tx);

        let loop_simulator = simulator.clone();
        thread::Builder::new()
            .name("docsim-engine-cmd".to_string())
            .spawn(move || {
                let guard = runtime.enter();
                while let Ok(command) = cmd_rx.recv() {
                    handle_command(&loop_simulator, &analyzer, &sink, command);
                }
                drop(guard);
                sim_debug!("Engine command channel closed; shutting down runtime");
                runtime.shutdown_timeout(Duration::from_millis(100));
            })?;

        sim_info!("Engine started with {:?}", settings);
        Ok(Self {
            cmd_tx,
            event_rx,
            simulator,
        })
    }

    pub fn start_upload(&self, file_id: FileId, name: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::StartUpload {
            file_id,
            name: name.into(),
        });
    }

    pub fn cancel_upload(&self, file_id: FileId) {
        let _ = self.cmd_tx.send(EngineCommand::CancelUpload { file_id });
    }

    pub fn run_analysis(&self, run: RunId, kind: AnalysisKind) {
        let _ = self.cmd_tx.send(EngineCommand::RunAnalysis { run, kind });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn active_uploads(&self) -> usize {
        self.simulator.active_uploads()
    }
}

fn handle_command(
    simulator: &ProgressSimulator,
    analyzer: &SimulatedAnalyzer,
    sink: &ChannelProgressSink,
    command: EngineCommand,
) {
    match command {
        EngineCommand::StartUpload { file_id, name } => {
            simulator.start(UploadRequest { file_id, name }, Arc::new(sink.clone()));
        }
        EngineCommand::CancelUpload { file_id } => {
            if !simulator.cancel(file_id) {
                sim_debug!("Cancel for inactive upload file_id={}", file_id);
            }
        }
        EngineCommand::RunAnalysis { run, kind } => {
            let analyzer = analyzer.clone();
            let sink = sink.clone();
            tokio::spawn(async move {
                let result = analyzer.run(run, kind).await;
                sink.emit(EngineEvent::AnalysisFinished { run, result });
            });
        }
    }
}
