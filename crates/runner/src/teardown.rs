use devsim_client::traits::{Model, Session, Simulator};
use devsim_client::RemoteError;
use tracing::{info, warn};

use crate::bootstrap::SessionGuard;

/// What happened while releasing a run's resources. Failures here are
/// reported alongside the run's own outcome and never replace it.
#[derive(Debug, Default)]
pub struct TeardownReport {
    pub session_released: bool,
    pub failures: Vec<TeardownFailure>,
}

#[derive(Debug)]
pub struct TeardownFailure {
    pub target: &'static str,
    pub error: RemoteError,
}

impl TeardownReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Handles the run acquired before it ended, released before the session.
#[derive(Debug)]
pub struct Handles<'a, M, S> {
    pub simulator: Option<&'a S>,
    pub model: Option<&'a M>,
}

/// Releases the session, consuming the guard. Handle release is best effort.
pub async fn release<Sess, M, S>(
    guard: Option<SessionGuard<Sess>>,
    handles: Handles<'_, M, S>,
    release_handles: bool,
) -> TeardownReport
where
    Sess: Session,
    M: Model,
    S: Simulator,
{
    let mut report = TeardownReport::default();

    let Some(guard) = guard else {
        info!("No session to release");
        return report;
    };

    if release_handles {
        if let Some(simulator) = handles.simulator {
            if let Err(error) = simulator.destroy().await {
                warn!(%error, "Failed to destroy simulator");
                report.failures.push(TeardownFailure {
                    target: "simulator",
                    error,
                });
            }
        }

        if let Some(model) = handles.model {
            if let Err(error) = model.destroy().await {
                warn!(%error, "Failed to destroy model");
                report.failures.push(TeardownFailure {
                    target: "model",
                    error,
                });
            }
        }
    }

    match guard.into_inner().close().await {
        Ok(()) => {
            info!("Session released");
            report.session_released = true;
        }
        Err(error) => {
            warn!(%error, "Failed to release session");
            report.failures.push(TeardownFailure {
                target: "session",
                error,
            });
        }
    }

    report
}
