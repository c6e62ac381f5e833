use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Simulated-time window of a single run.
///
/// `current` is the time of the last executed event and only moves forward.
/// `max` is the end-time bound, unset until the model reports one (or the
/// caller seeds it); an unset bound admits no events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    current: f64,
    max: Option<f64>,
}

impl TimeWindow {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: 0.0,
            max: None,
        }
    }

    #[must_use]
    pub const fn with_max(max: f64) -> Self {
        Self {
            current: 0.0,
            max: Some(max),
        }
    }

    #[must_use]
    pub const fn current(&self) -> f64 {
        self.current
    }

    #[must_use]
    pub const fn max(&self) -> Option<f64> {
        self.max
    }

    /// Whether an event at `time` lies strictly inside the bound.
    #[must_use]
    pub fn admits(&self, time: f64) -> bool {
        self.max.is_some_and(|max| time < max)
    }

    pub fn set_max(&mut self, max: f64) {
        self.max = Some(max);
    }

    pub fn advance_to(&mut self, time: f64) -> Result<(), TimeRegression> {
        if time < self.current {
            return Err(TimeRegression {
                current: self.current,
                requested: time,
            });
        }

        self.current = time;

        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[error("next event time {requested} precedes current time {current}")]
pub struct TimeRegression {
    pub current: f64,
    pub requested: f64,
}

#[cfg(test)]
#[path = "tests/time.rs"]
mod tests;
