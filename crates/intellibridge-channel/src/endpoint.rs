// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Channel endpoint: the single dispatch point for the intelligence channel.
//
// Every inbound call ends in exactly one resolution: a handler result, an
// INVALID_ARGUMENTS failure from validation, or the not-implemented reply.

use std::sync::Arc;

use intellibridge_bridge::traits::IntelligenceBridge;
use intellibridge_core::codec;
use intellibridge_core::error::BridgeError;
use intellibridge_core::{
    BridgeConfig, CallId, FailureDescriptor, MethodCall, MethodResponse, Operation,
};
use tracing::{debug, error, info};

use crate::completion::Completion;
use crate::handlers;
use crate::messenger::{BinaryMessenger, MessageHandler, Reply};

/// Sent if a response cannot be serialized; hand-built so it cannot fail.
const ENCODE_FAILURE_REPLY: &[u8] = br#"["INTERNAL","failed to encode reply",null]"#;

/// Native side of the intelligence channel.
pub struct ChannelEndpoint {
    config: Arc<BridgeConfig>,
    bridge: Arc<dyn IntelligenceBridge>,
}

impl ChannelEndpoint {
    pub fn new(config: BridgeConfig, bridge: Arc<dyn IntelligenceBridge>) -> Self {
        Self {
            config: Arc::new(config),
            bridge,
        }
    }

    pub fn channel_name(&self) -> &str {
        &self.config.channel_name
    }

    /// Route messages on this endpoint's channel name to it.
    ///
    /// Registering again replaces the previous handler on `messenger`.
    pub fn register(self: &Arc<Self>, messenger: &dyn BinaryMessenger) {
        let handler: Arc<dyn MessageHandler> = Arc::clone(self) as Arc<dyn MessageHandler>;
        messenger.set_message_handler(self.channel_name(), Some(handler));
    }

    /// Decode, validate, and hand `call` to its handler.
    ///
    /// Availability and every failure resolve before this returns. Model-backed
    /// operations run on tokio's blocking pool when a runtime is present.
    pub fn dispatch(&self, call: MethodCall, completion: Completion) {
        debug!(
            call_id = %completion.call_id(),
            method = %call.method,
            "dispatching call"
        );

        let operation = match Operation::decode(&call) {
            Ok(operation) => operation,
            Err(err) => {
                debug!(
                    call_id = %completion.call_id(),
                    method = completion.method(),
                    error = %err,
                    "call rejected"
                );
                completion.resolve(MethodResponse::from(Err(err)));
                return;
            }
        };
        debug!(
            call_id = %completion.call_id(),
            operation = operation.name(),
            "call decoded"
        );

        match operation {
            Operation::IsAvailable => {
                completion.resolve(handlers::is_available(self.bridge.as_ref(), &self.config));
            }
            Operation::GenerateResponse(request) => {
                self.run_model(completion, move |bridge, config| {
                    handlers::generate(bridge, config, &request)
                });
            }
            Operation::ParseStructuredResponse(request) => {
                self.run_model(completion, move |bridge, config| {
                    handlers::extract(bridge, config, &request)
                });
            }
        }
    }

    /// Dispatch `call` and wait for its single resolution.
    pub async fn invoke(&self, call: MethodCall) -> MethodResponse {
        let (completion, rx) = Completion::oneshot(CallId::new(), call.method.clone());
        self.dispatch(call, completion);
        // The completion always sends, from `resolve` or from its drop guard.
        rx.await
            .unwrap_or_else(|_| MethodResponse::Error(FailureDescriptor::from(&BridgeError::ReplyLost)))
    }

    fn run_model<F>(&self, completion: Completion, handler: F)
    where
        F: FnOnce(&dyn IntelligenceBridge, &BridgeConfig) -> MethodResponse + Send + 'static,
    {
        let bridge = Arc::clone(&self.bridge);
        let config = Arc::clone(&self.config);

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn_blocking(move || {
                    completion.resolve(handler(bridge.as_ref(), &config));
                });
            }
            Err(_) => completion.resolve(handler(bridge.as_ref(), &config)),
        }
    }
}

impl MessageHandler for ChannelEndpoint {
    fn on_message(&self, message: &[u8], reply: Reply) {
        let call = match codec::decode_method_call(message) {
            Ok(call) => call,
            Err(err) => {
                debug!(error = %err, "undecodable channel message");
                let response = MethodResponse::Error(FailureDescriptor::from(&err));
                reply.send(encode_or_internal(&response));
                return;
            }
        };

        let completion = Completion::new(CallId::new(), call.method.clone(), move |response| {
            reply.send(encode_or_internal(&response));
        });
        self.dispatch(call, completion);
    }
}

fn encode_or_internal(response: &MethodResponse) -> Vec<u8> {
    codec::encode_response(response).unwrap_or_else(|err| {
        error!(error = %err, "failed to encode channel reply");
        ENCODE_FAILURE_REPLY.to_vec()
    })
}

/// Install the intelligence channel on `messenger`.
///
/// This is the one registration path; the host calls it once at startup.
/// Calling it again replaces the earlier endpoint rather than adding a second.
pub fn install_intelligence_channel(
    messenger: &dyn BinaryMessenger,
    config: BridgeConfig,
    bridge: Arc<dyn IntelligenceBridge>,
) -> Arc<ChannelEndpoint> {
    let endpoint = Arc::new(ChannelEndpoint::new(config, bridge));
    endpoint.register(messenger);
    info!(
        channel = endpoint.channel_name(),
        platform = endpoint.bridge.platform_name(),
        "intelligence channel installed"
    );
    endpoint
}
