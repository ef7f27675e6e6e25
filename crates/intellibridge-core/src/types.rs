// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core protocol types for the on-device intelligence channel.
//
// Everything here is ephemeral: a call is decoded, answered once, and dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{BridgeError, Result};

/// Operation names understood by the endpoint.
pub mod methods {
    pub const IS_AVAILABLE: &str = "isAvailable";
    pub const GENERATE_RESPONSE: &str = "generateResponse";
    pub const PARSE_STRUCTURED_RESPONSE: &str = "parseStructuredResponse";
}

/// Failure codes carried in a `FailureDescriptor`.
pub mod codes {
    pub const INVALID_ARGUMENTS: &str = "INVALID_ARGUMENTS";
    /// Never sent as a descriptor: unknown methods get the empty not-implemented reply.
    pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";
    pub const INVALID_CALL: &str = "INVALID_CALL";
    pub const SCHEMA_MISMATCH: &str = "SCHEMA_MISMATCH";
    pub const HANDLER_DROPPED: &str = "HANDLER_DROPPED";
    pub const CHANNEL_ERROR: &str = "CHANNEL_ERROR";
    pub const PLATFORM_ERROR: &str = "PLATFORM_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Correlation id attached to every inbound call for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub Uuid);

impl CallId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One inbound call as it arrives at the boundary: a method name plus an
/// untyped argument payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    /// `Value::Null` when the caller sent no arguments.
    #[serde(rename = "args", default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// A call with no argument payload.
    pub fn bare(method: impl Into<String>) -> Self {
        Self::new(method, Value::Null)
    }
}

/// Structured failure returned across the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureDescriptor {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl FailureDescriptor {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&BridgeError> for FailureDescriptor {
    fn from(err: &BridgeError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

impl From<BridgeError> for FailureDescriptor {
    fn from(err: BridgeError) -> Self {
        Self::from(&err)
    }
}

/// The single resolution of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    /// A string, boolean, or mapping. Degraded values (unavailable capability)
    /// are still successes.
    Success(Value),
    Error(FailureDescriptor),
    /// The method name is not one this bridge version knows.
    NotImplemented,
}

impl MethodResponse {
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success(value.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Failure code, if this is an error response.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Error(failure) => Some(&failure.code),
            _ => None,
        }
    }
}

impl From<Result<Value>> for MethodResponse {
    fn from(result: Result<Value>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(BridgeError::NotImplemented(_)) => Self::NotImplemented,
            Err(err) => Self::Error(FailureDescriptor::from(&err)),
        }
    }
}

/// Free-text generation arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub context: Option<String>,
    pub system_prompt: Option<String>,
}

impl GenerationRequest {
    pub fn from_arguments(arguments: &Value) -> Result<Self> {
        let missing = || BridgeError::InvalidArguments("Missing required argument: prompt".into());
        let args = arguments.as_object().ok_or_else(missing)?;
        let prompt = string_arg(args, "prompt").ok_or_else(missing)?;

        Ok(Self {
            prompt,
            context: string_arg(args, "context"),
            system_prompt: string_arg(args, "systemPrompt"),
        })
    }
}

/// Schema-guided extraction arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub prompt: String,
    /// Free-form description of the wanted output shape, usually a JSON schema.
    pub schema: String,
}

impl ExtractionRequest {
    pub fn from_arguments(arguments: &Value) -> Result<Self> {
        let missing =
            || BridgeError::InvalidArguments("Missing required arguments: prompt, schema".into());
        let args = arguments.as_object().ok_or_else(missing)?;

        match (string_arg(args, "prompt"), string_arg(args, "schema")) {
            (Some(prompt), Some(schema)) => Ok(Self { prompt, schema }),
            _ => Err(missing()),
        }
    }
}

/// The closed set of operations, each with its typed arguments.
///
/// Only `Operation::decode` ever sees a raw method name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    IsAvailable,
    GenerateResponse(GenerationRequest),
    ParseStructuredResponse(ExtractionRequest),
}

impl Operation {
    /// Decode a boundary call into a typed operation.
    ///
    /// Unknown names yield `NotImplemented`; known names with bad payloads
    /// yield `InvalidArguments`.
    pub fn decode(call: &MethodCall) -> Result<Self> {
        match call.method.as_str() {
            methods::IS_AVAILABLE => Ok(Self::IsAvailable),
            methods::GENERATE_RESPONSE => Ok(Self::GenerateResponse(
                GenerationRequest::from_arguments(&call.arguments)?,
            )),
            methods::PARSE_STRUCTURED_RESPONSE => Ok(Self::ParseStructuredResponse(
                ExtractionRequest::from_arguments(&call.arguments)?,
            )),
            other => Err(BridgeError::NotImplemented(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::IsAvailable => methods::IS_AVAILABLE,
            Self::GenerateResponse(_) => methods::GENERATE_RESPONSE,
            Self::ParseStructuredResponse(_) => methods::PARSE_STRUCTURED_RESPONSE,
        }
    }
}

fn string_arg(args: &Map<String, Value>, key: &str) -> Option<String> {
    args.get(key).and_then(Value::as_str).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_method_is_not_implemented() {
        let err = Operation::decode(&MethodCall::bare("summarize")).unwrap_err();
        assert!(matches!(err, BridgeError::NotImplemented(ref m) if m == "summarize"));
    }

    #[test]
    fn is_available_ignores_payload() {
        for args in [Value::Null, json!({}), json!({"prompt": 3}), json!([1, 2])] {
            let call = MethodCall::new(methods::IS_AVAILABLE, args);
            assert_eq!(Operation::decode(&call).unwrap(), Operation::IsAvailable);
        }
    }

    #[test]
    fn generation_requires_string_prompt() {
        for args in [
            Value::Null,
            json!({}),
            json!({"context": "x"}),
            json!({"prompt": 42}),
            json!(["prompt"]),
        ] {
            let call = MethodCall::new(methods::GENERATE_RESPONSE, args);
            let err = Operation::decode(&call).unwrap_err();
            assert_eq!(err.code(), codes::INVALID_ARGUMENTS);
            assert!(err.to_string().contains("prompt"));
        }
    }

    #[test]
    fn generation_optional_fields() {
        let call = MethodCall::new(
            methods::GENERATE_RESPONSE,
            json!({"prompt": "Hello", "context": "trip to Lisbon", "systemPrompt": 7}),
        );
        let Operation::GenerateResponse(req) = Operation::decode(&call).unwrap() else {
            panic!("expected generation");
        };
        assert_eq!(req.prompt, "Hello");
        assert_eq!(req.context.as_deref(), Some("trip to Lisbon"));
        // Non-string optional fields are treated as absent.
        assert_eq!(req.system_prompt, None);
    }

    #[test]
    fn extraction_requires_prompt_and_schema() {
        let call = MethodCall::new(
            methods::PARSE_STRUCTURED_RESPONSE,
            json!({"prompt": "Two nights in Porto"}),
        );
        let err = Operation::decode(&call).unwrap_err();
        assert_eq!(err.code(), codes::INVALID_ARGUMENTS);
        assert_eq!(err.to_string(), "Missing required arguments: prompt, schema");

        let call = MethodCall::new(
            methods::PARSE_STRUCTURED_RESPONSE,
            json!({"prompt": "Two nights in Porto", "schema": "{}"}),
        );
        assert_eq!(Operation::decode(&call).unwrap().name(), methods::PARSE_STRUCTURED_RESPONSE);
    }

    #[test]
    fn not_implemented_maps_to_sentinel() {
        let resp = MethodResponse::from(Err(BridgeError::NotImplemented("x".into())));
        assert_eq!(resp, MethodResponse::NotImplemented);

        let resp = MethodResponse::from(Err(BridgeError::InvalidArguments("bad".into())));
        assert_eq!(resp.error_code(), Some(codes::INVALID_ARGUMENTS));
    }
}
