use devsim_primitives::jsonrpc::ResponseError;
use thiserror::Error;

/// Failure of a single remote call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("request failed with status {status_code}: {message}")]
    Status { status_code: u16, message: String },

    #[error(transparent)]
    Rpc(#[from] ResponseError),

    #[error("malformed response to `{method}`: {reason}")]
    MalformedResponse { method: String, reason: String },

    #[error("`{method}` returned no object")]
    MissingResult { method: String },
}

impl RemoteError {
    /// Error raised by the remote side, as opposed to the transport.
    pub fn rejected(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc(ResponseError {
            code,
            message: message.into(),
        })
    }
}
