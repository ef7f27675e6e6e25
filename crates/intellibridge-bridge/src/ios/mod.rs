// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS platform bridge via objc2.
//
// Requires compilation with the iOS SDK (Xcode). The availability gate reads
// the running OS version from `NSProcessInfo`, which is thread-safe and needs
// no main-thread marker.
//
// No public on-device model API is linked yet, so `model_wired` is false and
// generation/extraction report `PlatformUnavailable`. When a model lands, the
// two capability impls below are the only place that changes.

#![cfg(target_os = "ios")]

use objc2::rc::autoreleasepool;
use objc2_foundation::NSProcessInfo;
use serde_json::{Map, Value};

use intellibridge_core::error::{BridgeError, Result};
use intellibridge_core::{ExtractionRequest, GenerationRequest, OsVersion};

use crate::traits::*;

/// Read the running OS version from `NSProcessInfo`.
///
/// Handlers may probe from blocking-pool threads that have no autorelease
/// pool of their own, so the read drains its own.
fn running_os_version() -> Option<OsVersion> {
    let raw = autoreleasepool(|_| NSProcessInfo::processInfo().operatingSystemVersion());

    // NSInteger components; negative values would mean a broken runtime.
    let major = u32::try_from(raw.majorVersion).ok()?;
    let minor = u32::try_from(raw.minorVersion).ok()?;
    let patch = u32::try_from(raw.patchVersion).ok()?;
    Some(OsVersion::new(major, minor, patch))
}

/// iOS implementation of `IntelligenceBridge`.
pub struct IosBridge {
    name: String,
}

impl IosBridge {
    /// Create a new iOS bridge instance.
    pub fn new() -> Self {
        let name = match running_os_version() {
            Some(version) => format!("iOS {version}"),
            None => "iOS".to_string(),
        };
        Self { name }
    }
}

impl Default for IosBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl IntelligenceBridge for IosBridge {
    fn platform_name(&self) -> &str {
        &self.name
    }
}

impl AvailabilityProbe for IosBridge {
    fn os_version(&self) -> Option<OsVersion> {
        running_os_version()
    }

    fn model_wired(&self) -> bool {
        false
    }
}

impl TextGeneration for IosBridge {
    fn generate(&self, request: &GenerationRequest) -> Result<String> {
        tracing::debug!(
            prompt_len = request.prompt.len(),
            has_context = request.context.is_some(),
            has_system_prompt = request.system_prompt.is_some(),
            "on-device generation requested but no model is linked"
        );
        Err(BridgeError::PlatformUnavailable)
    }
}

impl StructuredExtraction for IosBridge {
    fn extract(&self, request: &ExtractionRequest) -> Result<Map<String, Value>> {
        tracing::debug!(
            prompt_len = request.prompt.len(),
            schema_len = request.schema.len(),
            "on-device extraction requested but no model is linked"
        );
        Err(BridgeError::PlatformUnavailable)
    }
}
