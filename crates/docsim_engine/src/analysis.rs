use std::time::Duration;

use docsim_logging::{sim_info, sim_warn};

use crate::{AnalysisKind, RunId, SimulationSettings};

/// Stand-in for the compliance analysis: waits, then reports the method it was asked for.
#[derive(Debug, Clone)]
pub struct SimulatedAnalyzer {
    duration: Duration,
    fault: Option<String>,
}

impl SimulatedAnalyzer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            fault: None,
        }
    }

    pub fn from_settings(settings: &SimulationSettings) -> Self {
        Self::new(settings.analysis_duration).with_fault(settings.analysis_fault.clone())
    }

    pub fn with_fault(mut self, fault: Option<String>) -> Self {
        self.fault = fault;
        self
    }

    pub async fn run(&self, run: RunId, kind: AnalysisKind) -> Result<AnalysisKind, String> {
        sim_info!("Analysis run {} started ({:?})", run, kind);
        tokio::time::sleep(self.duration).await;
        match &self.fault {
            Some(reason) => {
                sim_warn!("Analysis run {} failed: {}", run, reason);
                Err(reason.clone())
            }
            None => {
                sim_info!("Analysis run {} done ({:?})", run, kind);
                Ok(kind)
            }
        }
    }
}
