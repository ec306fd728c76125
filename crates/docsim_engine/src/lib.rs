//! Docsim engine: simulated upload transport and analysis runner.
mod analysis;
mod engine;
mod settings;
mod simulator;
mod types;

pub use analysis::SimulatedAnalyzer;
pub use engine::EngineHandle;
pub use settings::SimulationSettings;
pub use simulator::{
    ChannelProgressSink, FixedIncrement, IncrementSource, ProgressSimulator, ProgressSink,
    RandomIncrement, SimulatedTransport, UploadTransport,
};
pub use types::{
    AnalysisKind, EngineEvent, FailureKind, FileId, RunId, TransferError, UploadProgress,
    UploadRequest,
};
