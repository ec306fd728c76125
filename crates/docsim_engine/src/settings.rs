use std::time::Duration;

/// Timing and fault knobs for the simulation. None of these values are contracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationSettings {
    pub tick_interval: Duration,
    pub increment_min: u8,
    pub increment_max: u8,
    pub analysis_duration: Duration,
    /// Uploads whose file name contains this marker fail partway.
    pub fail_marker: Option<String>,
    /// When set, every analysis run fails with this reason.
    pub analysis_fault: Option<String>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            increment_min: 5,
            increment_max: 20,
            analysis_duration: Duration::from_millis(2000),
            fail_marker: None,
            analysis_fault: None,
        }
    }
}
