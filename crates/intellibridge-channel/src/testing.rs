// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test doubles shared by the handler and endpoint tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use intellibridge_bridge::traits::*;
use intellibridge_core::error::{BridgeError, Result};
use intellibridge_core::{ExtractionRequest, GenerationRequest, OsVersion};
use serde_json::{Map, Value};

/// A bridge with a wired model on a new enough OS.
pub struct FakeModel {
    fields: Map<String, Value>,
    fail: bool,
    /// Model invocations, to prove validation short-circuits.
    pub calls: Arc<AtomicUsize>,
}

impl FakeModel {
    pub fn ready() -> Self {
        Self {
            fields: Map::new(),
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::ready()
        }
    }

    pub fn with_fields(mut self, fields: Value) -> Self {
        self.fields = fields.as_object().cloned().unwrap_or_default();
        self
    }
}

impl IntelligenceBridge for FakeModel {
    fn platform_name(&self) -> &str {
        "fake"
    }
}

impl AvailabilityProbe for FakeModel {
    fn os_version(&self) -> Option<OsVersion> {
        Some(OsVersion::new(26, 0, 0))
    }

    fn model_wired(&self) -> bool {
        true
    }
}

impl TextGeneration for FakeModel {
    fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(BridgeError::Platform("model crashed".into()));
        }
        Ok(format!("echo: {}", request.prompt))
    }
}

impl StructuredExtraction for FakeModel {
    fn extract(&self, _request: &ExtractionRequest) -> Result<Map<String, Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(BridgeError::Platform("model crashed".into()));
        }
        Ok(self.fields.clone())
    }
}
