use devsim_client::traits::Simulator;
use devsim_client::MODEL_HOME_CAPABILITY;
use devsim_primitives::model::{ModelInfo, ModelOrigin};
use devsim_primitives::simulator::SimulatorState;
use devsim_primitives::time::TimeWindow;
use serde::Serialize;

use crate::lifecycle::SimulatorLifecycle;
use crate::provision::ProvisionedModel;

pub const DEFAULT_REGISTRY: &str = "ModelHome";

/// Knobs for a run. None of them changes step semantics.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Name the registry is published under.
    pub registry: String,
    /// Capability the registry must expose to pass the checked cast.
    pub capability: String,
    /// Initial end-time bound. Decoded `clock.time_max` values replace it.
    pub time_max: Option<f64>,
    /// Destroy the simulator and model before releasing the session.
    pub release_handles: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            registry: DEFAULT_REGISTRY.to_owned(),
            capability: MODEL_HOME_CAPABILITY.to_owned(),
            time_max: None,
            release_handles: true,
        }
    }
}

/// State owned by a single run, threaded through every stage.
#[derive(Debug)]
pub struct RunContext<M, S> {
    pub window: TimeWindow,
    pub model: Option<ProvisionedModel<M>>,
    pub lifecycle: Option<SimulatorLifecycle<S>>,
    pub steps: u64,
}

impl<M, S: Simulator> RunContext<M, S> {
    #[must_use]
    pub fn new(config: &RunConfig) -> Self {
        let window = config
            .time_max
            .map_or_else(TimeWindow::new, TimeWindow::with_max);

        Self {
            window,
            model: None,
            lifecycle: None,
            steps: 0,
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            origin: self.model.as_ref().map(|model| model.origin.clone()),
            model: self.model.as_ref().and_then(|model| model.info.clone()),
            state: self.lifecycle.as_ref().map(SimulatorLifecycle::state),
            steps: self.steps,
            current_time: self.window.current(),
            time_max: self.window.max(),
        }
    }
}

/// What a run achieved, for reporting.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub origin: Option<ModelOrigin>,
    pub model: Option<ModelInfo>,
    pub state: Option<SimulatorState>,
    pub steps: u64,
    pub current_time: f64,
    pub time_max: Option<f64>,
}
