use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use docsim_logging::{sim_debug, sim_info, sim_warn};
use rand::Rng;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    EngineEvent, FailureKind, FileId, SimulationSettings, TransferError, UploadProgress,
    UploadRequest,
};

const COMPLETE: u32 = 100;
/// Injected upload faults trip once progress reaches this value.
const INJECTED_FAULT_AT: u32 = 50;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

#[derive(Clone)]
pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

pub trait IncrementSource: Send + Sync {
    fn next_increment(&self) -> u8;
}

/// Uniform random step in `min..=max`.
#[derive(Debug, Clone, Copy)]
pub struct RandomIncrement {
    min: u8,
    max: u8,
}

impl RandomIncrement {
    pub fn new(min: u8, max: u8) -> Self {
        let min = min.max(1);
        Self {
            min,
            max: max.max(min),
        }
    }
}

impl IncrementSource for RandomIncrement {
    fn next_increment(&self) -> u8 {
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedIncrement(pub u8);

impl IncrementSource for FixedIncrement {
    fn next_increment(&self) -> u8 {
        self.0.max(1)
    }
}

/// Moves the bytes of one upload. The simulated transport moves none.
#[async_trait::async_trait]
pub trait UploadTransport: Send + Sync {
    async fn transfer(
        &self,
        request: &UploadRequest,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<(), TransferError>;
}

pub struct SimulatedTransport {
    tick_interval: Duration,
    increments: Arc<dyn IncrementSource>,
    fail_marker: Option<String>,
}

impl SimulatedTransport {
    pub fn new(tick_interval: Duration, increments: Arc<dyn IncrementSource>) -> Self {
        Self {
            tick_interval,
            increments,
            fail_marker: None,
        }
    }

    pub fn from_settings(settings: &SimulationSettings) -> Self {
        let increments = Arc::new(RandomIncrement::new(
            settings.increment_min,
            settings.increment_max,
        ));
        Self::new(settings.tick_interval, increments).with_fail_marker(settings.fail_marker.clone())
    }

    pub fn with_fail_marker(mut self, marker: Option<String>) -> Self {
        self.fail_marker = marker.filter(|m| !m.is_empty());
        self
    }

    fn should_fail(&self, request: &UploadRequest) -> bool {
        self.fail_marker
            .as_deref()
            .is_some_and(|marker| request.name.contains(marker))
    }
}

#[async_trait::async_trait]
impl UploadTransport for SimulatedTransport {
    async fn transfer(
        &self,
        request: &UploadRequest,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<(), TransferError> {
        let fail = self.should_fail(request);
        let mut progress: u32 = 0;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(TransferError::new(FailureKind::Cancelled, "upload cancelled"));
                }
                _ = tokio::time::sleep(self.tick_interval) => {}
            }
            // Cancellation may land in the same instant the timer fires.
            if cancel.is_cancelled() {
                return Err(TransferError::new(FailureKind::Cancelled, "upload cancelled"));
            }

            progress = (progress + u32::from(self.increments.next_increment())).min(COMPLETE);
            if fail && progress >= INJECTED_FAULT_AT {
                return Err(TransferError::new(
                    FailureKind::Injected {
                        at_progress: progress as u8,
                    },
                    "simulated transport failure",
                ));
            }
            sink.emit(EngineEvent::Progress(UploadProgress {
                file_id: request.file_id,
                progress: progress as u8,
            }));
            if progress >= COMPLETE {
                return Ok(());
            }
        }
    }
}

/// Runs one cancellable upload task per file id.
pub struct ProgressSimulator {
    transport: Arc<dyn UploadTransport>,
    tasks: Arc<Mutex<HashMap<FileId, CancellationToken>>>,
}

impl ProgressSimulator {
    pub fn new(transport: Arc<dyn UploadTransport>) -> Self {
        Self {
            transport,
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Spawns the upload task on the current tokio runtime.
    ///
    /// Returns `None` if an upload for the same id is already active.
    pub fn start(
        &self,
        request: UploadRequest,
        sink: Arc<dyn ProgressSink>,
    ) -> Option<JoinHandle<()>> {
        let file_id = request.file_id;
        let token = CancellationToken::new();
        {
            let mut tasks = lock_tasks(&self.tasks);
            if tasks.contains_key(&file_id) {
                sim_warn!("Upload for file {} already active; start ignored", file_id);
                return None;
            }
            tasks.insert(file_id, token.clone());
        }

        sim_info!("Upload started file_id={} name={}", file_id, request.name);
        let transport = self.transport.clone();
        let tasks = self.tasks.clone();
        Some(tokio::spawn(async move {
            let result = transport.transfer(&request, sink.as_ref(), &token).await;
            lock_tasks(&tasks).remove(&file_id);
            match result {
                Err(err) if err.kind == FailureKind::Cancelled => {
                    sim_debug!("Upload cancelled file_id={}", file_id);
                }
                Ok(()) => {
                    sim_info!("Upload completed file_id={}", file_id);
                    sink.emit(EngineEvent::UploadFinished {
                        file_id,
                        result: Ok(()),
                    });
                }
                Err(err) => {
                    sim_warn!("Upload failed file_id={}: {}", file_id, err);
                    sink.emit(EngineEvent::UploadFinished {
                        file_id,
                        result: Err(err),
                    });
                }
            }
        }))
    }

    /// Stops the task for `file_id`. Returns false if none was active.
    pub fn cancel(&self, file_id: FileId) -> bool {
        match lock_tasks(&self.tasks).remove(&file_id) {
            Some(token) => {
                token.cancel();
                sim_debug!("Cancel requested file_id={}", file_id);
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, file_id: FileId) -> bool {
        lock_tasks(&self.tasks).contains_key(&file_id)
    }

    pub fn active_uploads(&self) -> usize {
        lock_tasks(&self.tasks).len()
    }
}

fn lock_tasks(
    tasks: &Mutex<HashMap<FileId, CancellationToken>>,
) -> std::sync::MutexGuard<'_, HashMap<FileId, CancellationToken>> {
    // The map holds no invariant a panicking holder could break.
    tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
