//! Typed views of the remote capabilities.
//!
//! Each trait mirrors one remote interface. Implementations own whatever
//! transport state they need; callers never see it.

use async_trait::async_trait;
use devsim_primitives::common::ObjectId;
use devsim_primitives::message::MessageBatch;

use crate::errors::RemoteError;

/// Opens sessions against a simulation service.
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: Session;

    async fn connect(&self) -> Result<Self::Session, RemoteError>;
}

/// A long-lived session with the service.
#[async_trait]
pub trait Session: Send + Sync {
    type Home: ModelHome;

    /// Resolves `name` and narrows it to a registry, provided the remote
    /// object reports `capability` among its ids. `Ok(None)` means the object
    /// exists but is not a registry.
    async fn checked_cast(
        &self,
        name: &str,
        capability: &str,
    ) -> Result<Option<Self::Home>, RemoteError>;

    /// Releases the session. Handles obtained through it become unusable.
    async fn close(&self) -> Result<(), RemoteError>;
}

/// The remote model registry.
#[async_trait]
pub trait ModelHome: Send + Sync {
    type Model: Model;
    type Simulator: Simulator;

    async fn create_with_config(
        &self,
        name: &str,
        config: &str,
    ) -> Result<Self::Model, RemoteError>;

    async fn create_from_descriptor(&self, descriptor: &str) -> Result<Self::Model, RemoteError>;

    async fn create_sim(&self, model: &Self::Model) -> Result<Self::Simulator, RemoteError>;

    async fn model_list(&self) -> Result<Vec<String>, RemoteError>;

    /// Default parameters of the named model, as the JSON text a
    /// configuration file for it would hold.
    async fn model_info(&self, name: &str) -> Result<String, RemoteError>;
}

/// A provisioned model instance.
#[async_trait]
pub trait Model: Send + Sync {
    fn id(&self) -> &ObjectId;

    async fn name(&self) -> Result<String, RemoteError>;

    async fn capabilities(&self) -> Result<Vec<String>, RemoteError>;

    /// Drains the model's pending output. `None` when the remote side hands
    /// back no buffer at all.
    async fn output_function(&self) -> Result<Option<MessageBatch>, RemoteError>;

    async fn destroy(&self) -> Result<(), RemoteError>;
}

/// A simulator driving exactly one model.
#[async_trait]
pub trait Simulator: Send + Sync {
    fn id(&self) -> &ObjectId;

    async fn start(&self) -> Result<bool, RemoteError>;

    async fn next_event_time(&self) -> Result<f64, RemoteError>;

    async fn exec_next_event(&self) -> Result<(), RemoteError>;

    async fn destroy(&self) -> Result<(), RemoteError>;
}
