// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON method codec for channel messages.
//
// Calls travel as `{"method": .., "args": ..}`. Replies are envelopes:
// `[result]` on success, `[code, message, details]` on failure, and a
// zero-length message when the method is not implemented.

use serde_json::{Value, json};

use crate::error::{BridgeError, Result};
use crate::types::{FailureDescriptor, MethodCall, MethodResponse};

pub fn encode_method_call(call: &MethodCall) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(call)?)
}

pub fn decode_method_call(message: &[u8]) -> Result<MethodCall> {
    serde_json::from_slice(message).map_err(|e| BridgeError::InvalidCall(e.to_string()))
}

pub fn encode_response(response: &MethodResponse) -> Result<Vec<u8>> {
    let envelope = match response {
        MethodResponse::NotImplemented => return Ok(Vec::new()),
        MethodResponse::Success(value) => json!([value]),
        MethodResponse::Error(failure) => json!([
            failure.code,
            failure.message,
            failure.details.clone().unwrap_or(Value::Null),
        ]),
    };
    Ok(serde_json::to_vec(&envelope)?)
}

pub fn decode_response(message: &[u8]) -> Result<MethodResponse> {
    if message.is_empty() {
        return Ok(MethodResponse::NotImplemented);
    }

    let envelope: Value =
        serde_json::from_slice(message).map_err(|e| BridgeError::InvalidCall(e.to_string()))?;

    match envelope.as_array().map(Vec::as_slice) {
        Some([result]) => Ok(MethodResponse::Success(result.clone())),
        Some([Value::String(code), message, details]) => {
            let mut failure =
                FailureDescriptor::new(code.clone(), message.as_str().unwrap_or_default());
            if !details.is_null() {
                failure = failure.with_details(details.clone());
            }
            Ok(MethodResponse::Error(failure))
        }
        _ => Err(BridgeError::InvalidCall(format!(
            "unrecognised reply envelope: {envelope}"
        ))),
    }
}
