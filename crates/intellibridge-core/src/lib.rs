// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intellibridge — Protocol types, codec, and error definitions shared across all crates.

pub mod codec;
pub mod config;
pub mod error;
pub mod schema;
pub mod types;
pub mod version;

pub use config::BridgeConfig;
pub use error::BridgeError;
pub use types::*;
pub use version::OsVersion;
