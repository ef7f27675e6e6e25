// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for on-device intelligence.
//
// The channel handlers only ever talk to `IntelligenceBridge`. A platform that
// has no usable model returns `BridgeError::PlatformUnavailable`, which the
// handlers turn into a degraded success rather than a failure.

use intellibridge_core::error::Result;
use intellibridge_core::{ExtractionRequest, GenerationRequest, OsVersion};
use serde_json::{Map, Value};

/// Unified bridge that groups the on-device capabilities.
///
/// `Send + Sync` because handlers may finish a call on a blocking-pool thread.
pub trait IntelligenceBridge:
    AvailabilityProbe + TextGeneration + StructuredExtraction + Send + Sync
{
    /// Human-readable platform name (e.g. "iOS 18.2.0", "Desktop (stub)").
    fn platform_name(&self) -> &str;
}

/// Where the on-device capability stands right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityState {
    /// The platform reports no OS version we can gate on.
    Unsupported,
    /// The OS is older than the configured minimum.
    BelowMinimumVersion {
        found: OsVersion,
        required: OsVersion,
    },
    /// The OS is new enough but no model is wired up.
    NotWired,
    Ready,
}

impl CapabilityState {
    /// Apply the version gate, then the wiring check.
    pub fn evaluate(os_version: Option<OsVersion>, minimum: OsVersion, model_wired: bool) -> Self {
        match os_version {
            None => Self::Unsupported,
            Some(found) if found < minimum => Self::BelowMinimumVersion {
                found,
                required: minimum,
            },
            Some(_) if !model_wired => Self::NotWired,
            Some(_) => Self::Ready,
        }
    }

    /// The boolean capability descriptor sent to the caller.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Platform facts the availability gate is computed from.
///
/// Implementations must be cheap and side-effect-free; the probe runs on
/// every `isAvailable` call and nothing is cached.
pub trait AvailabilityProbe {
    /// Running OS version, if the platform exposes one.
    fn os_version(&self) -> Option<OsVersion>;

    /// Whether a real on-device model is linked in.
    fn model_wired(&self) -> bool;

    fn capability_state(&self, minimum: OsVersion) -> CapabilityState {
        CapabilityState::evaluate(self.os_version(), minimum, self.model_wired())
    }
}

/// Free-text generation.
pub trait TextGeneration {
    /// Generate a reply to `request.prompt`.
    /// Returns `PlatformUnavailable` when no model is wired.
    fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Schema-guided extraction.
pub trait StructuredExtraction {
    /// Produce a mapping shaped by `request.schema`.
    /// Returns `PlatformUnavailable` when no model is wired.
    fn extract(&self, request: &ExtractionRequest) -> Result<Map<String, Value>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: OsVersion = OsVersion::new(18, 0, 0);

    #[test]
    fn no_version_is_unsupported() {
        let state = CapabilityState::evaluate(None, MIN, true);
        assert_eq!(state, CapabilityState::Unsupported);
        assert!(!state.is_available());
    }

    #[test]
    fn below_gate_is_unavailable_even_if_wired() {
        let found = OsVersion::new(17, 5, 1);
        let state = CapabilityState::evaluate(Some(found), MIN, true);
        assert_eq!(
            state,
            CapabilityState::BelowMinimumVersion {
                found,
                required: MIN
            }
        );
        assert!(!state.is_available());
    }

    #[test]
    fn at_gate_without_model_is_not_wired() {
        let state = CapabilityState::evaluate(Some(MIN), MIN, false);
        assert_eq!(state, CapabilityState::NotWired);
        assert!(!state.is_available());
    }

    #[test]
    fn only_ready_is_available() {
        let state = CapabilityState::evaluate(Some(OsVersion::new(26, 0, 0)), MIN, true);
        assert_eq!(state, CapabilityState::Ready);
        assert!(state.is_available());
    }
}
