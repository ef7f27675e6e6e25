// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intellibridge — Channel endpoint and capability handlers.
//
// A `BinaryMessenger` routes raw channel messages to the `ChannelEndpoint`,
// which decodes each call into an `Operation`, validates it, and hands it to
// a handler together with a single-use `Completion`.

pub mod completion;
pub mod endpoint;
pub mod handlers;
pub mod messenger;

#[cfg(test)]
mod testing;

pub use completion::Completion;
pub use endpoint::{ChannelEndpoint, install_intelligence_channel};
pub use messenger::{BinaryMessenger, LocalMessenger, MessageHandler, Reply};
