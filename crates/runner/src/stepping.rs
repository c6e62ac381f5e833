use devsim_client::traits::{Model, Simulator};
use devsim_primitives::simulator::SimulatorState;
use devsim_primitives::time::TimeWindow;
use tracing::info;

use crate::decode;
use crate::error::{LoopError, RunError};
use crate::lifecycle::SimulatorLifecycle;

/// Advances the simulation one event at a time while the next event lies
/// strictly before the end-time bound. Each executed event is followed by a
/// decode of the model's output, which may move the bound before the next
/// query. `steps` counts executed events, also on failure.
pub async fn run<M, S>(
    lifecycle: &mut SimulatorLifecycle<S>,
    model: &M,
    window: &mut TimeWindow,
    steps: &mut u64,
) -> Result<(), RunError>
where
    M: Model,
    S: Simulator,
{
    loop {
        let next = lifecycle
            .simulator()
            .next_event_time()
            .await
            .map_err(LoopError::NextEventTime)?;

        if !window.admits(next) {
            info!(next, time_max = ?window.max(), steps = *steps, "Reached end-time bound");
            lifecycle.transition(SimulatorState::Terminated)?;
            return Ok(());
        }

        window.advance_to(next).map_err(LoopError::from)?;
        lifecycle.transition(SimulatorState::Stepping)?;

        info!(time = next, "Executing next event");

        lifecycle
            .simulator()
            .exec_next_event()
            .await
            .map_err(|source| LoopError::ExecNextEvent { time: next, source })?;

        *steps += 1;

        let _batch = decode::decode_into(model, window).await?;
    }
}
