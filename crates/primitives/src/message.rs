use core::slice;

use serde::{Deserialize, Serialize};

/// A single entry of a model's output buffer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputMessage {
    pub port: i64,
    /// Structured payload, JSON encoded by the remote side.
    pub value_to_json: String,
}

impl OutputMessage {
    pub fn new(port: i64, value_to_json: impl Into<String>) -> Self {
        Self {
            port,
            value_to_json: value_to_json.into(),
        }
    }
}

/// Messages returned by one `outputFunction` call, in port emission order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageBatch(Vec<OutputMessage>);

impl MessageBatch {
    #[must_use]
    pub const fn new(messages: Vec<OutputMessage>) -> Self {
        Self(messages)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, OutputMessage> {
        self.0.iter()
    }
}

impl From<Vec<OutputMessage>> for MessageBatch {
    fn from(messages: Vec<OutputMessage>) -> Self {
        Self(messages)
    }
}

impl FromIterator<OutputMessage> for MessageBatch {
    fn from_iter<I: IntoIterator<Item = OutputMessage>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MessageBatch {
    type Item = &'a OutputMessage;
    type IntoIter = slice::Iter<'a, OutputMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
