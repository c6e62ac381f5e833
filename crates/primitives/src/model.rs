use std::fmt;

use serde::{Deserialize, Serialize};

/// How a model instance was provisioned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ModelOrigin {
    /// Named model built from a configuration payload.
    NamedConfig { name: String },
    /// Model built from a raw descriptor payload alone.
    Descriptor,
}

impl fmt::Display for ModelOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamedConfig { name } => write!(f, "named config <{name}>"),
            Self::Descriptor => f.write_str("descriptor"),
        }
    }
}

/// Introspection data reported by a provisioned model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub capabilities: Vec<String>,
}

impl ModelInfo {
    #[must_use]
    pub fn capabilities_list(&self) -> String {
        self.capabilities.join(",")
    }
}
