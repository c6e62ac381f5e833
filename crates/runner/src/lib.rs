//! Orchestration of a single remote simulation run
//!
//! The run follows a fixed chain of remote calls:
//!
//! ```text
//! bootstrap -> provision -> create/start simulator -> { step <-> decode } -> teardown
//! ```
//!
//! Exactly one remote call is in flight at any time. Every step waits for the
//! previous step's decode to finish because the decoded output may move the
//! end-time bound the loop checks next.
//!
//! ## Core Concepts
//!
//! - **RunContext**: everything a run owns (time window, model, simulator)
//! - **SessionGuard**: the open session; consuming it is the only way to
//!   release it, so teardown happens once
//! - **MessageDecoder**: turns a model's output batch into time-bound updates
//!
//! The crate depends only on the traits in `devsim_client::traits`; any
//! transport implementing them can drive a run.

pub mod bootstrap;
pub mod context;
pub mod decode;
pub mod error;
pub mod lifecycle;
pub mod provision;
pub mod run;
pub mod stepping;
pub mod teardown;

pub use context::{RunConfig, RunContext, RunSummary};
pub use error::RunError;
pub use provision::ModelSource;
pub use run::{list_models, model_info, run, RunOutcome};
pub use teardown::TeardownReport;
