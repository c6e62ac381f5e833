//! Output decoding
//!
//! A model's output batch is retrieved in one call and each entry's JSON
//! payload is inspected on its own. Entries that do not parse are skipped;
//! they never take their siblings down with them. The only field the run
//! cares about is `clock.time_max`, the end-time bound.

use devsim_client::traits::Model;
use devsim_primitives::message::MessageBatch;
use devsim_primitives::time::TimeWindow;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::DecodeError;

const TIME_MAX_POINTER: &str = "/clock/time_max";

/// Retrieves the model's pending output batch.
pub async fn decode<M: Model>(model: &M) -> Result<MessageBatch, DecodeError> {
    let batch = model
        .output_function()
        .await
        .map_err(DecodeError::Retrieval)?
        .ok_or(DecodeError::MissingBuffer)?;

    debug!(size = batch.len(), "Retrieved output batch");

    Ok(batch)
}

/// The end-time bound carried by `batch`, if any. When several messages
/// carry one, the last in batch order wins.
pub fn extract_time_max(batch: &MessageBatch) -> Option<f64> {
    let mut time_max = None;

    for (index, message) in batch.iter().enumerate() {
        debug!(index, port = message.port, value = %message.value_to_json, "Output message");

        let value = match serde_json::from_str::<Value>(&message.value_to_json) {
            Ok(value) => value,
            Err(err) => {
                warn!(index, port = message.port, %err, "Skipping malformed output message");
                continue;
            }
        };

        if let Some(max) = value.pointer(TIME_MAX_POINTER).and_then(Value::as_f64) {
            time_max = Some(max);
        }
    }

    time_max
}

/// Decodes `model`'s output and applies any end-time bound to `window`.
pub async fn decode_into<M: Model>(
    model: &M,
    window: &mut TimeWindow,
) -> Result<MessageBatch, DecodeError> {
    let batch = decode(model).await?;

    if let Some(max) = extract_time_max(&batch) {
        window.set_max(max);
        info!(time_max = max, "Updated end-time bound");
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use devsim_primitives::message::OutputMessage;

    use super::*;

    fn batch(values: &[&str]) -> MessageBatch {
        values
            .iter()
            .zip(0..)
            .map(|(value, port)| OutputMessage::new(port, *value))
            .collect()
    }

    #[test]
    fn test_extracts_nested_time_max() {
        let batch = batch(&[r#"{"clock":{"time_max":42}}"#]);

        assert_eq!(extract_time_max(&batch), Some(42.0));
    }

    #[test]
    fn test_last_time_max_in_batch_wins() {
        let batch = batch(&[
            r#"{"clock":{"time_max":42}}"#,
            r#"{"population":12}"#,
            r#"{"clock":{"time_max":7.5}}"#,
        ]);

        assert_eq!(extract_time_max(&batch), Some(7.5));
    }

    #[test]
    fn test_malformed_entry_does_not_hide_siblings() {
        let batch = batch(&["{not json", r#"{"clock":{"time_max":10}}"#]);

        assert_eq!(extract_time_max(&batch), Some(10.0));
    }

    #[test]
    fn test_entries_without_bound_yield_nothing() {
        let batch = batch(&[
            r#"{"clock":{"time":3}}"#,
            r#"{"clock":{"time_max":"soon"}}"#,
            "17",
            "null",
        ]);

        assert_eq!(extract_time_max(&batch), None);
        assert_eq!(extract_time_max(&MessageBatch::default()), None);
    }
}
