use crate::utils::error::{Result, SyncError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

fn invalid(message: impl Into<String>) -> SyncError {
    SyncError::MessageError {
        message: message.into(),
    }
}

/// One record of a queue batch, borrowed from the trigger event.
#[derive(Debug, Clone, Copy)]
pub struct QueueMessage<'a> {
    pub id: &'a str,
    pub body: Option<&'a str>,
}

/// Reads the pagination offset from a queue message body.
///
/// Accepts `{"offset": 5}`, `{"offset": "5"}` and Pub/Sub style envelopes
/// whose `data` field holds the base64 encoded message. A message without
/// an offset starts from 0.
pub fn parse_offset_message(body: &[u8]) -> Result<u64> {
    let value: Value = serde_json::from_slice(body)?;

    let value = match value.get("data").and_then(Value::as_str) {
        Some(data) => {
            let decoded = STANDARD.decode(data.trim())?;
            serde_json::from_slice(&decoded)?
        }
        None => value,
    };

    if !value.is_object() {
        return Err(invalid(format!("expected a JSON object, got {}", value)));
    }

    match value.get("offset") {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| invalid(format!("offset must be a non-negative integer, got {}", n))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid(format!("offset must be a non-negative integer, got '{}'", s))),
        Some(other) => Err(invalid(format!("unsupported offset value {}", other))),
    }
}

pub fn encode_offset_message(offset: u64) -> String {
    serde_json::json!({ "offset": offset }).to_string()
}
