//! JSON-RPC 2.0 envelope used to reach the simulation service.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Request Id is unique per connection and increases with every call.
pub type RequestId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Version {
    TwoPointZero,
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Self::TwoPointZero => serializer.serialize_str("2.0"),
        }
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let version_str = String::deserialize(deserializer)?;
        match version_str.as_str() {
            "2.0" => Ok(Self::TwoPointZero),
            _ => Err(serde::de::Error::custom("Invalid JSON-RPC version")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub jsonrpc: Version,
    pub method: String,
    pub params: Value,
    pub id: RequestId,
}

impl Request {
    pub fn new(id: RequestId, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: Version::TwoPointZero,
            method: method.into(),
            params,
            id,
        }
    }
}

#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("remote error {code}: {message}")]
pub struct ResponseError {
    pub code: i64,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub jsonrpc: Version,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ResponseError>,
    pub id: Option<RequestId>,
}

impl Response {
    /// Collapses the envelope into the call outcome. A missing `result` with
    /// no `error` is reported as `Value::Null`.
    pub fn into_result(self) -> Result<Value, ResponseError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_serializes_flat_envelope() {
        let request = Request::new(3, "simulator.start", json!({ "target": "sim-1" }));

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "method": "simulator.start",
                "params": { "target": "sim-1" },
                "id": 3
            })
        );
    }

    #[test]
    fn test_response_error_wins_over_result() {
        let response: Response = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "result": true,
            "error": { "code": -32000, "message": "no such model" },
            "id": 1
        }))
        .unwrap();

        let err = response.into_result().unwrap_err();
        assert_eq!(err.code, -32000);
        assert_eq!(err.message, "no such model");
    }

    #[test]
    fn test_response_without_result_is_null() {
        let response: Response =
            serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 9 })).unwrap();

        assert_eq!(response.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn test_invalid_version_rejected() {
        let result = serde_json::from_value::<Response>(json!({ "jsonrpc": "1.0", "id": 1 }));

        assert!(result.is_err());
    }
}
