// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line-oriented session: one call envelope in, one reply envelope out.

use intellibridge_channel::LocalMessenger;
use intellibridge_core::{FailureDescriptor, MethodResponse, codec};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Written in place of the zero-length not-implemented reply.
const NOT_IMPLEMENTED_LINE: &[u8] = b"null";

/// Forward each non-empty input line to `channel` and write the reply.
///
/// Calls are answered in input order. Lines are forwarded as raw bytes, so a
/// line that is not valid UTF-8 gets an INVALID_CALL envelope like any other
/// undecodable call. Transport failures (no handler on the channel) are
/// reported as error envelopes rather than ending the session.
pub async fn serve<R, W>(
    messenger: &LocalMessenger,
    channel: &str,
    mut input: R,
    mut output: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }

        let reply = match messenger.send(channel, line.to_vec()).await {
            Ok(bytes) if bytes.is_empty() => NOT_IMPLEMENTED_LINE.to_vec(),
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(channel, error = %e, "channel send failed");
                let response = MethodResponse::Error(FailureDescriptor::from(&e));
                codec::encode_response(&response).map_err(std::io::Error::other)?
            }
        };

        output.write_all(&reply).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
        tracing::debug!(bytes = reply.len(), "reply written");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use intellibridge_bridge::stub::StubBridge;
    use intellibridge_channel::install_intelligence_channel;
    use intellibridge_core::BridgeConfig;
    use serde_json::{Value, json};

    async fn run(input: &str) -> Vec<Value> {
        run_bytes(input.as_bytes()).await
    }

    async fn run_bytes(input: &[u8]) -> Vec<Value> {
        let messenger = LocalMessenger::new();
        let config = BridgeConfig::default();
        let channel = config.channel_name.clone();
        install_intelligence_channel(&messenger, config, Arc::new(StubBridge::new()));

        let mut output = Vec::new();
        serve(&messenger, &channel, input, &mut output)
            .await
            .unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn answers_each_line_in_order() {
        let input = concat!(
            r#"{"method":"isAvailable"}"#, "\n",
            "\n",
            r#"{"method":"generateResponse","args":{"context":"x"}}"#, "\n",
            r#"{"method":"parseStructuredResponse","args":{"prompt":"p","schema":"s"}}"#, "\n",
            r#"{"method":"translate","args":null}"#, "\n",
        );

        let replies = run(input).await;
        assert_eq!(
            replies,
            vec![
                json!([false]),
                json!(["INVALID_ARGUMENTS", "Missing required argument: prompt", null]),
                json!([{}]),
                Value::Null,
            ]
        );
    }

    #[tokio::test]
    async fn garbage_line_gets_invalid_call() {
        let replies = run("hello there\n").await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0][0], json!("INVALID_CALL"));
    }

    #[tokio::test]
    async fn non_utf8_line_gets_invalid_call_and_session_continues() {
        let replies = run_bytes(b"\xff\xfe\n{\"method\":\"isAvailable\"}\r\n").await;
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0][0], json!("INVALID_CALL"));
        assert_eq!(replies[1], json!([false]));
    }

    #[tokio::test]
    async fn last_line_without_newline_is_answered() {
        let replies = run(r#"{"method":"isAvailable"}"#).await;
        assert_eq!(replies, vec![json!([false])]);
    }

    #[tokio::test]
    async fn wrong_channel_reports_error_envelope() {
        let messenger = LocalMessenger::new();
        let mut output = Vec::new();
        serve(&messenger, "other/channel", &b"{\"method\":\"isAvailable\"}\n"[..], &mut output)
            .await
            .unwrap();

        let reply: Value = serde_json::from_slice(output.trim_ascii_end()).unwrap();
        assert_eq!(reply[0], json!("CHANNEL_ERROR"));
    }
}
