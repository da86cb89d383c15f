// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON method codec, wire-compatible with the UI runtime's JSON method channel.
//
//   call            {"method": "<name>", "args": <any>}
//   success         [result]
//   error           [code, message, details]
//   not implemented empty reply

use lightalarm_core::error::{AlarmBridgeError, Result};
use serde_json::{Value, json};

use super::{MethodCall, MethodResponse};

/// Decode a method call envelope.
pub fn decode_call(bytes: &[u8]) -> Result<MethodCall> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Encode a reply envelope.
pub fn encode_response(response: &MethodResponse) -> Vec<u8> {
    let envelope = match response {
        MethodResponse::NotImplemented => return Vec::new(),
        MethodResponse::Success(result) => json!([result]),
        MethodResponse::Error {
            code,
            message,
            details,
        } => json!([code, message, details]),
    };
    // Serializing a `Value` cannot fail.
    serde_json::to_vec(&envelope).unwrap_or_default()
}

/// Encode the error envelope for `err`, for replies produced without a
/// handler (e.g. before the service is initialised).
pub fn encode_error(err: &AlarmBridgeError) -> Vec<u8> {
    encode_response(&MethodResponse::from(err))
}

/// Decode a reply envelope.
pub fn decode_response(bytes: &[u8]) -> Result<MethodResponse> {
    if bytes.is_empty() {
        return Ok(MethodResponse::NotImplemented);
    }
    let envelope: Vec<Value> = serde_json::from_slice(bytes)?;
    let mut items = envelope.into_iter();
    Ok(match (items.next(), items.next(), items.next()) {
        (Some(result), None, None) => MethodResponse::Success(result),
        (Some(Value::String(code)), message, details) => MethodResponse::Error {
            code,
            message: message.and_then(|m| m.as_str().map(str::to_owned)).unwrap_or_default(),
            details: details.unwrap_or(Value::Null),
        },
        _ => MethodResponse::error_with_code("BAD_MESSAGE", "malformed reply envelope"),
    })
}
