use core::error::Error as _;

use devsim_client::RemoteError;
use devsim_primitives::simulator::InvalidTransition;
use devsim_primitives::time::TimeRegression;
use thiserror::Error;

/// Failure of one stage of a run. Each stage makes a single attempt, so every
/// variant is fatal to the run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunError {
    #[error("connection error")]
    Connection(#[from] ConnectionError),

    #[error("provisioning error")]
    Provisioning(#[source] RemoteError),

    #[error("lifecycle error")]
    Lifecycle(#[from] LifecycleError),

    #[error("decode error")]
    Decode(#[from] DecodeError),

    #[error("loop error")]
    Loop(#[from] LoopError),

    #[error("registry query failed")]
    Registry(#[source] RemoteError),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConnectionError {
    #[error("unable to establish a session")]
    Session(#[source] RemoteError),

    #[error("unable to resolve registry `{name}`")]
    Resolve {
        name: String,
        #[source]
        source: RemoteError,
    },

    #[error("`{name}` does not expose capability `{capability}`")]
    NotARegistry { name: String, capability: String },
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LifecycleError {
    #[error("registry rejected simulator binding")]
    Bind(#[source] RemoteError),

    #[error("simulator start failed")]
    Start(#[source] RemoteError),

    #[error("unable to start simulator")]
    StartRefused,

    #[error(transparent)]
    Transition(#[from] InvalidTransition),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("output retrieval failed")]
    Retrieval(#[source] RemoteError),

    #[error("output message buffer undefined")]
    MissingBuffer,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoopError {
    #[error("next event time query failed")]
    NextEventTime(#[source] RemoteError),

    #[error("executing event at t={time} failed")]
    ExecNextEvent {
        time: f64,
        #[source]
        source: RemoteError,
    },

    #[error(transparent)]
    TimeRegression(#[from] TimeRegression),
}

impl RunError {
    /// The error and its causes on one line, outermost first.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut description = self.to_string();
        let mut source = self.source();

        while let Some(cause) = source {
            description.push_str(": ");
            description.push_str(&cause.to_string());
            source = cause.source();
        }

        description
    }
}

impl From<InvalidTransition> for RunError {
    fn from(err: InvalidTransition) -> Self {
        Self::Lifecycle(err.into())
    }
}
