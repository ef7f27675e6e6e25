// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where no on-device model exists.
//
// Generation and extraction return `PlatformUnavailable`. The OS version can
// be pinned so the availability gate is testable off-device.

use intellibridge_core::error::{BridgeError, Result};
use intellibridge_core::{ExtractionRequest, GenerationRequest, OsVersion};
use serde_json::{Map, Value};

use crate::traits::*;

/// No-model bridge returned on non-iOS platforms.
#[derive(Debug, Clone)]
pub struct StubBridge {
    os_version: Option<OsVersion>,
    name: String,
}

impl StubBridge {
    pub fn new() -> Self {
        Self {
            os_version: None,
            name: "Desktop (stub)".into(),
        }
    }

    /// Pretend to run on the given OS version.
    pub fn with_os_version(os_version: OsVersion) -> Self {
        Self {
            os_version: Some(os_version),
            name: format!("Simulated {os_version} (stub)"),
        }
    }
}

impl Default for StubBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl IntelligenceBridge for StubBridge {
    fn platform_name(&self) -> &str {
        &self.name
    }
}

impl AvailabilityProbe for StubBridge {
    fn os_version(&self) -> Option<OsVersion> {
        self.os_version
    }

    fn model_wired(&self) -> bool {
        false
    }
}

impl TextGeneration for StubBridge {
    fn generate(&self, request: &GenerationRequest) -> Result<String> {
        tracing::debug!(
            prompt_len = request.prompt.len(),
            "TextGeneration::generate called on stub bridge"
        );
        Err(BridgeError::PlatformUnavailable)
    }
}

impl StructuredExtraction for StubBridge {
    fn extract(&self, _request: &ExtractionRequest) -> Result<Map<String, Value>> {
        tracing::debug!("StructuredExtraction::extract called on stub bridge");
        Err(BridgeError::PlatformUnavailable)
    }
}
