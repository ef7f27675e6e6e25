// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability handlers.
//
// Arguments arrive already validated. An absent capability is never an error
// here: the probe answers `false`, generation answers with the configured
// advisory, and extraction answers with an empty mapping.

use intellibridge_bridge::traits::IntelligenceBridge;
use intellibridge_core::error::BridgeError;
use intellibridge_core::schema::SchemaShape;
use intellibridge_core::{
    BridgeConfig, ExtractionRequest, FailureDescriptor, GenerationRequest, MethodResponse,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// `isAvailable`: recompute the capability descriptor from platform facts.
pub fn is_available(bridge: &dyn IntelligenceBridge, config: &BridgeConfig) -> MethodResponse {
    let state = bridge.capability_state(config.minimum_os_version);
    debug!(platform = bridge.platform_name(), ?state, "availability probed");
    MethodResponse::success(state.is_available())
}

/// `generateResponse`: one string, degraded to the advisory when no model runs.
pub fn generate(
    bridge: &dyn IntelligenceBridge,
    config: &BridgeConfig,
    request: &GenerationRequest,
) -> MethodResponse {
    if !bridge.capability_state(config.minimum_os_version).is_available() {
        return MethodResponse::success(config.fallback_message.clone());
    }

    match bridge.generate(request) {
        Ok(text) => MethodResponse::success(text),
        Err(BridgeError::PlatformUnavailable) => {
            MethodResponse::success(config.fallback_message.clone())
        }
        Err(err) => {
            warn!(error = %err, "on-device generation failed");
            MethodResponse::Error(FailureDescriptor::from(&err))
        }
    }
}

/// `parseStructuredResponse`: a mapping that conforms to `request.schema`, or
/// an explicit failure. Never a partially conforming mapping.
pub fn extract(
    bridge: &dyn IntelligenceBridge,
    config: &BridgeConfig,
    request: &ExtractionRequest,
) -> MethodResponse {
    if !bridge.capability_state(config.minimum_os_version).is_available() {
        return MethodResponse::success(Value::Object(Map::new()));
    }

    let fields = match bridge.extract(request) {
        Ok(fields) => fields,
        Err(BridgeError::PlatformUnavailable) => Map::new(),
        Err(err) => {
            warn!(error = %err, "on-device extraction failed");
            return MethodResponse::Error(FailureDescriptor::from(&err));
        }
    };

    if config.enforce_schema {
        if let Err(err) = SchemaShape::parse(&request.schema).check(&fields) {
            warn!(error = %err, "extraction result rejected");
            return MethodResponse::Error(
                FailureDescriptor::from(&err).with_details(Value::Object(fields)),
            );
        }
    }

    MethodResponse::success(Value::Object(fields))
}
