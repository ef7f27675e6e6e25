// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intellibridge — host harness.
//
// Entry point. Initialises logging, loads config, installs the intelligence
// channel exactly once, then serves newline-delimited method calls from stdin:
//
//     {"method": "generateResponse", "args": {"prompt": "Hello"}}
//
// Each reply envelope is written to stdout on its own line. A not-implemented
// reply (zero-length message) is written as `null`.

mod session;

use std::sync::Arc;

use intellibridge_bridge::traits::IntelligenceBridge;
use intellibridge_channel::{LocalMessenger, install_intelligence_channel};
use intellibridge_core::BridgeConfig;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Logs go to stderr so stdout carries only reply envelopes.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Intellibridge host starting");

    let config = match BridgeConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "config load failed — using defaults");
            BridgeConfig::default()
        }
    };
    let channel = config.channel_name.clone();

    let messenger = LocalMessenger::new();
    let bridge: Arc<dyn IntelligenceBridge> = Arc::from(intellibridge_bridge::platform_bridge());
    install_intelligence_channel(&messenger, config, bridge);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    session::serve(&messenger, &channel, stdin, stdout).await?;

    tracing::info!("Intellibridge host shutting down");
    Ok(())
}
