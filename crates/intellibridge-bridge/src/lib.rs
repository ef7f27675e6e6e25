// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Intellibridge — Native on-device intelligence abstractions.
//!
//! This crate defines the capability traits the channel handlers call into
//! and picks the implementation for the target operating system. On iOS the
//! bridge reads real platform facts through `objc2`; everywhere else a stub
//! answers with "not available" so the protocol layer can run in CI.

pub mod traits;

#[cfg(target_os = "ios")]
pub mod ios;

pub mod stub;

/// Retrieves the bridge implementation for the target operating system.
///
/// RETURNS: A boxed trait object (`dyn IntelligenceBridge`) that hides the
/// underlying native SDK details.
pub fn platform_bridge() -> Box<dyn traits::IntelligenceBridge> {
    #[cfg(target_os = "ios")]
    {
        // iOS: reads NSProcessInfo through `objc2`.
        Box::new(ios::IosBridge::new())
    }
    #[cfg(not(target_os = "ios"))]
    {
        // DESKTOP/CI: no on-device model, no OS version gate to pass.
        Box::new(stub::StubBridge::new())
    }
}
