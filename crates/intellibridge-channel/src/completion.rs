// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-use response slot for one call.
//
// `resolve` takes `self`, so a handler cannot answer twice. A completion that
// is dropped unresolved (early return, panicking task) answers with
// `HANDLER_DROPPED` on the way out, so no call is ever left pending.

use intellibridge_core::error::BridgeError;
use intellibridge_core::{CallId, FailureDescriptor, MethodResponse};
use serde_json::Value;
use tokio::sync::oneshot;

type Sink = Box<dyn FnOnce(MethodResponse) + Send>;

pub struct Completion {
    call_id: CallId,
    method: String,
    sink: Option<Sink>,
}

impl Completion {
    /// Wrap an arbitrary sink; it is invoked exactly once.
    pub fn new(
        call_id: CallId,
        method: impl Into<String>,
        sink: impl FnOnce(MethodResponse) + Send + 'static,
    ) -> Self {
        Self {
            call_id,
            method: method.into(),
            sink: Some(Box::new(sink)),
        }
    }

    /// A completion whose response arrives on the returned receiver.
    pub fn oneshot(
        call_id: CallId,
        method: impl Into<String>,
    ) -> (Self, oneshot::Receiver<MethodResponse>) {
        let (tx, rx) = oneshot::channel();
        let completion = Self::new(call_id, method, move |response| {
            // The caller may have stopped waiting; nothing else to do.
            let _ = tx.send(response);
        });
        (completion, rx)
    }

    pub fn call_id(&self) -> CallId {
        self.call_id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn resolve(mut self, response: MethodResponse) {
        if let Some(sink) = self.sink.take() {
            tracing::trace!(
                call_id = %self.call_id,
                method = %self.method,
                success = response.is_success(),
                "call resolved"
            );
            sink(response);
        }
    }

    pub fn succeed(self, value: impl Into<Value>) {
        self.resolve(MethodResponse::success(value));
    }

    pub fn fail(self, err: BridgeError) {
        self.resolve(MethodResponse::from(Err(err)));
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(sink) = self.sink.take() {
            tracing::warn!(
                call_id = %self.call_id,
                method = %self.method,
                "completion dropped without a response"
            );
            let err = BridgeError::HandlerDropped(self.method.clone());
            sink(MethodResponse::Error(FailureDescriptor::from(&err)));
        }
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("call_id", &self.call_id)
            .field("method", &self.method)
            .field("pending", &self.sink.is_some())
            .finish()
    }
}
