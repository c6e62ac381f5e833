use devsim_client::traits::{Connector, ModelHome, Session};
use devsim_primitives::simulator::SimulatorState;
use tracing::{error, info};

use crate::bootstrap::{self, SessionGuard};
use crate::context::{RunConfig, RunContext, RunSummary};
use crate::decode;
use crate::error::RunError;
use crate::lifecycle::SimulatorLifecycle;
use crate::provision::{self, ModelSource};
use crate::stepping;
use crate::teardown::{self, Handles, TeardownReport};

type Home<C> = <<C as Connector>::Session as Session>::Home;
type ModelOf<C> = <Home<C> as ModelHome>::Model;
type SimulatorOf<C> = <Home<C> as ModelHome>::Simulator;

/// Outcome of a run: the stage result plus the teardown that always follows.
#[derive(Debug)]
pub struct RunOutcome<T> {
    pub result: Result<T, RunError>,
    pub teardown: TeardownReport,
}

impl<T> RunOutcome<T> {
    fn unconnected(err: RunError) -> Self {
        Self {
            result: Err(err),
            teardown: TeardownReport::default(),
        }
    }
}

/// Drives one simulation run end to end.
pub async fn run<C: Connector>(
    connector: &C,
    config: &RunConfig,
    source: &ModelSource,
) -> RunOutcome<RunSummary> {
    let mut context = RunContext::<ModelOf<C>, SimulatorOf<C>>::new(config);

    let guard = match bootstrap::open_session(connector).await {
        Ok(guard) => guard,
        Err(err) => return fail::<C>(err.into(), None, &context, config).await,
    };

    let result = drive(guard.session(), config, source, &mut context).await;

    if let Err(err) = result {
        if let Some(lifecycle) = context.lifecycle.as_mut() {
            lifecycle.fail();
        }
        return fail::<C>(err, Some(guard), &context, config).await;
    }

    let teardown = release::<C>(Some(guard), &context, config).await;
    let summary = context.summary();

    info!(steps = summary.steps, time = summary.current_time, "Done");

    RunOutcome {
        result: Ok(summary),
        teardown,
    }
}

/// Lists the models the registry can build.
pub async fn list_models<C: Connector>(connector: &C, config: &RunConfig) -> RunOutcome<Vec<String>> {
    let guard = match bootstrap::open_session(connector).await {
        Ok(guard) => guard,
        Err(err) => return RunOutcome::unconnected(err.into()),
    };

    let result: Result<Vec<String>, RunError> = async {
        let home =
            bootstrap::resolve_registry(guard.session(), &config.registry, &config.capability)
                .await?;
        home.model_list().await.map_err(RunError::Registry)
    }
    .await;

    let teardown = release_session::<C>(guard).await;

    RunOutcome { result, teardown }
}

/// Fetches the default parameters of `name`, the template for its
/// configuration file.
pub async fn model_info<C: Connector>(
    connector: &C,
    config: &RunConfig,
    name: &str,
) -> RunOutcome<String> {
    let guard = match bootstrap::open_session(connector).await {
        Ok(guard) => guard,
        Err(err) => return RunOutcome::unconnected(err.into()),
    };

    let result: Result<String, RunError> = async {
        let home =
            bootstrap::resolve_registry(guard.session(), &config.registry, &config.capability)
                .await?;

        info!(%name, "Requesting model parameters");

        home.model_info(name).await.map_err(RunError::Registry)
    }
    .await;

    let teardown = release_session::<C>(guard).await;

    RunOutcome { result, teardown }
}

async fn drive<S: Session>(
    session: &S,
    config: &RunConfig,
    source: &ModelSource,
    context: &mut RunContext<
        <S::Home as ModelHome>::Model,
        <S::Home as ModelHome>::Simulator,
    >,
) -> Result<(), RunError> {
    let home = bootstrap::resolve_registry(session, &config.registry, &config.capability).await?;

    let model = context.model.insert(provision::provision(&home, source).await?);

    let lifecycle = context
        .lifecycle
        .insert(SimulatorLifecycle::create(&home, &model.handle).await?);

    lifecycle.start().await?;

    // The model's initial output usually carries the end-time bound.
    let _batch = decode::decode_into(&model.handle, &mut context.window).await?;

    stepping::run(
        lifecycle,
        &model.handle,
        &mut context.window,
        &mut context.steps,
    )
    .await?;

    debug_assert_eq!(lifecycle.state(), SimulatorState::Terminated);

    Ok(())
}

async fn release<C: Connector>(
    guard: Option<SessionGuard<C::Session>>,
    context: &RunContext<ModelOf<C>, SimulatorOf<C>>,
    config: &RunConfig,
) -> TeardownReport {
    let handles = Handles {
        simulator: context.lifecycle.as_ref().map(SimulatorLifecycle::simulator),
        model: context.model.as_ref().map(|model| &model.handle),
    };

    teardown::release(guard, handles, config.release_handles).await
}

/// Closes a session that never acquired model or simulator handles.
async fn release_session<C: Connector>(guard: SessionGuard<C::Session>) -> TeardownReport {
    let handles = Handles::<ModelOf<C>, SimulatorOf<C>> {
        simulator: None,
        model: None,
    };

    teardown::release(Some(guard), handles, false).await
}

async fn fail<C: Connector>(
    err: RunError,
    guard: Option<SessionGuard<C::Session>>,
    context: &RunContext<ModelOf<C>, SimulatorOf<C>>,
    config: &RunConfig,
) -> RunOutcome<RunSummary> {
    error!(error = %err.describe(), "Run failed");

    RunOutcome {
        result: Err(err),
        teardown: release::<C>(guard, context, config).await,
    }
}
