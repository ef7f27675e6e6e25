// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Intellibridge.

use thiserror::Error;

use crate::types::codes;

/// Top-level error type for all Intellibridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    // -- Call contract --
    #[error("{0}")]
    InvalidArguments(String),

    #[error("method not implemented: {0}")]
    NotImplemented(String),

    #[error("malformed method call: {0}")]
    InvalidCall(String),

    #[error("result does not conform to schema: {0}")]
    SchemaMismatch(String),

    #[error("handler for `{0}` completed without a response")]
    HandlerDropped(String),

    // -- Channel / transport --
    #[error("no handler registered on channel `{0}`")]
    ChannelNotRegistered(String),

    #[error("reply channel closed before a response arrived")]
    ReplyLost,

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Platform(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl BridgeError {
    /// Wire code reported to the calling side for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArguments(_) => codes::INVALID_ARGUMENTS,
            Self::NotImplemented(_) => codes::NOT_IMPLEMENTED,
            Self::InvalidCall(_) | Self::Serialization(_) => codes::INVALID_CALL,
            Self::SchemaMismatch(_) => codes::SCHEMA_MISMATCH,
            Self::HandlerDropped(_) => codes::HANDLER_DROPPED,
            Self::ChannelNotRegistered(_) | Self::ReplyLost => codes::CHANNEL_ERROR,
            Self::Config(_) | Self::Io(_) => codes::INTERNAL,
            Self::Platform(_) | Self::PlatformUnavailable => codes::PLATFORM_ERROR,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_arguments_displays_bare_message() {
        let err = BridgeError::InvalidArguments("Missing required argument: prompt".into());
        assert_eq!(err.to_string(), "Missing required argument: prompt");
        assert_eq!(err.code(), "INVALID_ARGUMENTS");
    }

    #[test]
    fn platform_errors_share_a_code() {
        assert_eq!(BridgeError::PlatformUnavailable.code(), codes::PLATFORM_ERROR);
        assert_eq!(
            BridgeError::Platform("objc exception".into()).code(),
            codes::PLATFORM_ERROR
        );
    }
}
