use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle of a simulator bound to a model.
///
/// ```text
/// Created -> Started -> Stepping -> Terminated
///               \__________________/
/// ```
///
/// `Failed` is absorbing and reachable from every state. A run whose first
/// next-event time is already out of bounds goes straight from `Started` to
/// `Terminated`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SimulatorState {
    Created,
    Started,
    Stepping,
    Terminated,
    Failed,
}

impl SimulatorState {
    pub fn transition(self, next: Self) -> Result<Self, InvalidTransition> {
        let allowed = matches!(
            (self, next),
            (Self::Created, Self::Started)
                | (Self::Started | Self::Stepping, Self::Stepping | Self::Terminated)
                | (_, Self::Failed)
        );

        if allowed {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Terminated | Self::Failed)
    }
}

impl fmt::Display for SimulatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Started => "started",
            Self::Stepping => "stepping",
            Self::Terminated => "terminated",
            Self::Failed => "failed",
        };
        f.pad(name)
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("invalid simulator transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: SimulatorState,
    pub to: SimulatorState,
}

#[cfg(test)]
#[path = "tests/simulator.rs"]
mod tests;
