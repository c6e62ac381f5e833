//! Devsim Client Library
//!
//! Typed interfaces for the remote capabilities a simulation run talks to
//! (session, model registry, model, simulator) and a JSON-RPC over HTTP
//! adapter implementing them.
//!
//! Orchestration code should depend on the traits in [`traits`] only; the
//! [`rpc`] module is one transport among possible others.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use devsim_client::rpc::RpcConnector;
//! use devsim_client::traits::{Connector, ModelHome, Session};
//! use devsim_client::MODEL_HOME_CAPABILITY;
//!
//! # async fn demo() -> Result<(), devsim_client::RemoteError> {
//! let connector = RpcConnector::new("http://127.0.0.1:10000".parse()?, None)?;
//! let session = connector.connect().await?;
//!
//! if let Some(home) = session.checked_cast("ModelHome", MODEL_HOME_CAPABILITY).await? {
//!     for name in home.model_list().await? {
//!         println!("{name}");
//!     }
//! }
//!
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod errors;
pub mod rpc;
pub mod traits;

pub use connection::Connection;
pub use errors::RemoteError;
pub use traits::{Connector, Model, ModelHome, Session, Simulator};
pub use url::Url;

/// Capability id a registry must expose to pass the checked cast.
pub const MODEL_HOME_CAPABILITY: &str = "::devsim::ModelHome";
