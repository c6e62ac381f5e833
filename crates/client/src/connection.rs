//! Connection management for the simulation service
//!
//! A [`Connection`] issues JSON-RPC calls over HTTP, one at a time, and
//! carries the session token once a session has been opened.

use core::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use devsim_primitives::jsonrpc::{Request, Response};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::errors::RemoteError;

/// Relative to the endpoint URL, so a base path in the endpoint is kept.
pub const JSONRPC_PATH: &str = "jsonrpc";
pub const SESSION_HEADER: &str = "X-Session";

#[derive(Debug)]
pub struct Connection {
    pub api_url: Url,
    rpc_url: Url,
    client: Client,
    session: Option<String>,
    next_id: AtomicU64,
}

impl Connection {
    pub fn new(api_url: Url, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        let mut builder = Client::builder();

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            rpc_url: rpc_url(&api_url)?,
            api_url,
            client: builder.build()?,
            session: None,
            next_id: AtomicU64::new(1),
        })
    }

    /// Attaches a session token to every subsequent call.
    #[must_use]
    pub fn with_session(mut self, token: String) -> Self {
        self.session = Some(token);
        self
    }

    pub async fn call<O>(&self, method: &str, params: Value) -> Result<O, RemoteError>
    where
        O: DeserializeOwned,
    {
        let value = self.call_raw(method, params).await?;

        serde_json::from_value(value).map_err(|err| RemoteError::MalformedResponse {
            method: method.to_owned(),
            reason: err.to_string(),
        })
    }

    async fn call_raw(&self, method: &str, params: Value) -> Result<Value, RemoteError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request::new(id, method, params);

        debug!(%method, id, "Sending request");

        let mut builder = self.client.post(self.rpc_url.clone()).json(&request);

        if let Some(token) = &self.session {
            builder = builder.header(SESSION_HEADER, token);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            return Err(RemoteError::Status {
                status_code: response.status().as_u16(),
                message: response.text().await?,
            });
        }

        let response = response
            .json::<Response>()
            .await
            .map_err(|err| RemoteError::MalformedResponse {
                method: method.to_owned(),
                reason: err.to_string(),
            })?;

        if response.id.is_some_and(|rid| rid != id) {
            return Err(RemoteError::MalformedResponse {
                method: method.to_owned(),
                reason: format!("response id does not match request id {id}"),
            });
        }

        Ok(response.into_result()?)
    }
}

fn rpc_url(api_url: &Url) -> Result<Url, RemoteError> {
    let mut base = api_url.clone();

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    Ok(base.join(JSONRPC_PATH)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(api_url: &str) -> String {
        rpc_url(&api_url.parse().unwrap()).unwrap().to_string()
    }

    #[test]
    fn test_rpc_url_keeps_base_path() {
        assert_eq!(resolved("http://sim.example"), "http://sim.example/jsonrpc");
        assert_eq!(resolved("http://sim.example/"), "http://sim.example/jsonrpc");
        assert_eq!(resolved("http://sim.example/sim"), "http://sim.example/sim/jsonrpc");
        assert_eq!(
            resolved("http://sim.example:10000/a/b/"),
            "http://sim.example:10000/a/b/jsonrpc"
        );
    }
}
