//! JSON-RPC implementation of the client traits.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use devsim_primitives::common::ObjectId;
use devsim_primitives::message::MessageBatch;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use url::Url;

use crate::connection::Connection;
use crate::errors::RemoteError;
use crate::traits::{Connector, Model, ModelHome, Session, Simulator};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionOpened {
    session: String,
}

#[derive(Clone, Debug)]
pub struct RpcConnector {
    api_url: Url,
    timeout: Option<Duration>,
}

impl RpcConnector {
    pub fn new(api_url: Url, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        if api_url.cannot_be_a_base() {
            return Err(RemoteError::Endpoint(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        Ok(Self { api_url, timeout })
    }
}

#[async_trait]
impl Connector for RpcConnector {
    type Session = RpcSession;

    async fn connect(&self) -> Result<Self::Session, RemoteError> {
        let connection = Connection::new(self.api_url.clone(), self.timeout)?;

        let opened: SessionOpened = connection.call("session.open", json!({})).await?;

        info!(api_url = %self.api_url, "Session opened");

        Ok(RpcSession {
            connection: Arc::new(connection.with_session(opened.session)),
        })
    }
}

#[derive(Clone, Debug)]
pub struct RpcSession {
    connection: Arc<Connection>,
}

#[async_trait]
impl Session for RpcSession {
    type Home = RpcModelHome;

    async fn checked_cast(
        &self,
        name: &str,
        capability: &str,
    ) -> Result<Option<Self::Home>, RemoteError> {
        let is_a: bool = self
            .connection
            .call(
                "object.isA",
                json!({ "target": name, "capability": capability }),
            )
            .await?;

        if !is_a {
            return Ok(None);
        }

        let id = ObjectId::new(name).map_err(|err| RemoteError::MalformedResponse {
            method: "object.isA".to_owned(),
            reason: err.to_string(),
        })?;

        Ok(Some(RpcModelHome {
            connection: Arc::clone(&self.connection),
            id,
        }))
    }

    async fn close(&self) -> Result<(), RemoteError> {
        self.connection.call("session.close", json!({})).await
    }
}

#[derive(Clone, Debug)]
pub struct RpcModelHome {
    connection: Arc<Connection>,
    id: ObjectId,
}

impl RpcModelHome {
    async fn create_object(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<ObjectId, RemoteError> {
        let id: Option<ObjectId> = self.connection.call(method, params).await?;

        id.ok_or_else(|| RemoteError::MissingResult {
            method: method.to_owned(),
        })
    }
}

#[async_trait]
impl ModelHome for RpcModelHome {
    type Model = RpcModel;
    type Simulator = RpcSimulator;

    async fn create_with_config(
        &self,
        name: &str,
        config: &str,
    ) -> Result<Self::Model, RemoteError> {
        let id = self
            .create_object(
                "modelHome.createWithConfig",
                json!({ "target": self.id, "name": name, "config": config }),
            )
            .await?;

        Ok(RpcModel {
            connection: Arc::clone(&self.connection),
            id,
        })
    }

    async fn create_from_descriptor(&self, descriptor: &str) -> Result<Self::Model, RemoteError> {
        let id = self
            .create_object(
                "modelHome.createFromDescriptor",
                json!({ "target": self.id, "descriptor": descriptor }),
            )
            .await?;

        Ok(RpcModel {
            connection: Arc::clone(&self.connection),
            id,
        })
    }

    async fn create_sim(&self, model: &Self::Model) -> Result<Self::Simulator, RemoteError> {
        let id = self
            .create_object(
                "modelHome.createSim",
                json!({ "target": self.id, "model": model.id }),
            )
            .await?;

        Ok(RpcSimulator {
            connection: Arc::clone(&self.connection),
            id,
        })
    }

    async fn model_list(&self) -> Result<Vec<String>, RemoteError> {
        self.connection
            .call("modelHome.getModelList", json!({ "target": self.id }))
            .await
    }

    async fn model_info(&self, name: &str) -> Result<String, RemoteError> {
        self.connection
            .call(
                "modelHome.getModelInfo",
                json!({ "target": self.id, "name": name }),
            )
            .await
    }
}

#[derive(Clone, Debug)]
pub struct RpcModel {
    connection: Arc<Connection>,
    id: ObjectId,
}

#[async_trait]
impl Model for RpcModel {
    fn id(&self) -> &ObjectId {
        &self.id
    }

    async fn name(&self) -> Result<String, RemoteError> {
        self.connection
            .call("model.getName", json!({ "target": self.id }))
            .await
    }

    async fn capabilities(&self) -> Result<Vec<String>, RemoteError> {
        self.connection
            .call("model.ids", json!({ "target": self.id }))
            .await
    }

    async fn output_function(&self) -> Result<Option<MessageBatch>, RemoteError> {
        self.connection
            .call("model.outputFunction", json!({ "target": self.id }))
            .await
    }

    async fn destroy(&self) -> Result<(), RemoteError> {
        self.connection
            .call("model.destroy", json!({ "target": self.id }))
            .await
    }
}

#[derive(Clone, Debug)]
pub struct RpcSimulator {
    connection: Arc<Connection>,
    id: ObjectId,
}

#[async_trait]
impl Simulator for RpcSimulator {
    fn id(&self) -> &ObjectId {
        &self.id
    }

    async fn start(&self) -> Result<bool, RemoteError> {
        self.connection
            .call("simulator.start", json!({ "target": self.id }))
            .await
    }

    /// An exhausted event queue reports +inf, which JSON carries as `null`.
    async fn next_event_time(&self) -> Result<f64, RemoteError> {
        let time: Option<f64> = self
            .connection
            .call("simulator.nextEventTime", json!({ "target": self.id }))
            .await?;

        Ok(time.unwrap_or(f64::INFINITY))
    }

    async fn exec_next_event(&self) -> Result<(), RemoteError> {
        self.connection
            .call("simulator.execNextEvent", json!({ "target": self.id }))
            .await
    }

    async fn destroy(&self) -> Result<(), RemoteError> {
        self.connection
            .call("simulator.destroy", json!({ "target": self.id }))
            .await
    }
}
