// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binary messenger: routes channel messages to the handler registered under
// the channel's name.
//
// On a device the messenger is the managed runtime's engine; `LocalMessenger`
// is the in-process equivalent the host binary and the tests use.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use intellibridge_core::error::{BridgeError, Result};
use tokio::sync::oneshot;

/// One-shot reply to a channel message.
pub struct Reply(Box<dyn FnOnce(Vec<u8>) + Send>);

impl Reply {
    pub fn new(f: impl FnOnce(Vec<u8>) + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn send(self, message: Vec<u8>) {
        (self.0)(message);
    }
}

/// Receives raw messages arriving on a channel.
pub trait MessageHandler: Send + Sync {
    /// Handle `message`; `reply` must be sent exactly once.
    fn on_message(&self, message: &[u8], reply: Reply);
}

/// Transport side of a channel registration.
pub trait BinaryMessenger: Send + Sync {
    /// Install `handler` for `channel`, replacing any previous one.
    /// `None` removes the registration.
    fn set_message_handler(&self, channel: &str, handler: Option<Arc<dyn MessageHandler>>);
}

/// In-process messenger.
#[derive(Default)]
pub struct LocalMessenger {
    handlers: RwLock<HashMap<String, Arc<dyn MessageHandler>>>,
}

impl LocalMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `message` on `channel` and wait for the reply.
    pub async fn send(&self, channel: &str, message: Vec<u8>) -> Result<Vec<u8>> {
        let handler = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel)
            .cloned()
            .ok_or_else(|| BridgeError::ChannelNotRegistered(channel.to_string()))?;

        let (tx, rx) = oneshot::channel();
        handler.on_message(
            &message,
            Reply::new(move |bytes| {
                let _ = tx.send(bytes);
            }),
        );

        rx.await.map_err(|_| BridgeError::ReplyLost)
    }

    pub fn is_registered(&self, channel: &str) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(channel)
    }

    /// Number of channels with a handler installed.
    pub fn channel_count(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl BinaryMessenger for LocalMessenger {
    fn set_message_handler(&self, channel: &str, handler: Option<Arc<dyn MessageHandler>>) {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        match handler {
            Some(handler) => {
                if handlers.insert(channel.to_string(), handler).is_some() {
                    tracing::warn!(channel, "replacing existing channel handler");
                } else {
                    tracing::debug!(channel, "channel handler installed");
                }
            }
            None => {
                if handlers.remove(channel).is_some() {
                    tracing::debug!(channel, "channel handler removed");
                }
            }
        }
    }
}
