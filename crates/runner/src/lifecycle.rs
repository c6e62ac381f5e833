use devsim_client::traits::{ModelHome, Simulator};
use devsim_primitives::simulator::{InvalidTransition, SimulatorState};
use tracing::{info, warn};

use crate::error::LifecycleError;

/// A simulator handle together with its lifecycle state.
#[derive(Debug)]
pub struct SimulatorLifecycle<S> {
    simulator: S,
    state: SimulatorState,
}

impl<S: Simulator> SimulatorLifecycle<S> {
    pub async fn create<H>(home: &H, model: &H::Model) -> Result<Self, LifecycleError>
    where
        H: ModelHome<Simulator = S>,
    {
        info!("Creating simulator");

        let simulator = home.create_sim(model).await.map_err(LifecycleError::Bind)?;

        Ok(Self {
            simulator,
            state: SimulatorState::Created,
        })
    }

    /// Starts the simulator. Anything but `true` leaves it short of stepping.
    pub async fn start(&mut self) -> Result<(), LifecycleError> {
        let started = self.simulator.start().await.map_err(LifecycleError::Start)?;

        if !started {
            return Err(LifecycleError::StartRefused);
        }

        self.transition(SimulatorState::Started)?;

        info!("Simulator started");

        Ok(())
    }

    pub const fn simulator(&self) -> &S {
        &self.simulator
    }

    pub const fn state(&self) -> SimulatorState {
        self.state
    }

    pub fn transition(&mut self, next: SimulatorState) -> Result<(), InvalidTransition> {
        self.state = self.state.transition(next)?;
        Ok(())
    }

    /// Marks the simulator failed unless it already reached a final state.
    pub fn fail(&mut self) {
        if self.state.is_final() {
            return;
        }

        warn!(state = %self.state, "Simulator run failed");
        self.state = SimulatorState::Failed;
    }
}
