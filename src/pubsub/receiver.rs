use std::io::Write;
use std::time::Duration;

use log::{debug, info};
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::pubsub::api::PubSubApi;
use crate::pubsub::config::DEFAULT_PULL_MAX_MESSAGES;
use crate::pubsub::paths::subscription_path;
use crate::pubsub::types::PubSubMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveOptions {
    /// Stop listening after this long; `None` listens until cancelled
    pub timeout: Option<Duration>,
    /// Stop after this many messages
    pub max_messages: Option<usize>,
    /// Upper bound for a single pull
    pub batch_size: u32,
}

impl Default for ReceiveOptions {
    fn default() -> Self {
        Self { timeout: None, max_messages: None, batch_size: DEFAULT_PULL_MAX_MESSAGES }
    }
}

/// Pulls from a subscription and hands every message to `callback`,
/// acknowledging it as soon as the callback returns.
///
/// Returns the number of messages received. An elapsed timeout cancels
/// `cancel` and ends the run without error; cancelling `cancel` from
/// elsewhere (e.g. Ctrl-C) does the same.
pub async fn receive<A, W, F>(
    api: &A,
    out: &mut W,
    project_id: &str,
    subscription_id: &str,
    options: ReceiveOptions,
    cancel: CancellationToken,
    mut callback: F,
) -> Result<usize>
where
    A: PubSubApi,
    W: Write,
    F: FnMut(&PubSubMessage),
{
    let path = subscription_path(project_id, subscription_id);
    writeln!(out, "Listening for messages on {}..\n", path)?;
    out.flush()?;

    let deadline = async {
        match options.timeout {
            Some(timeout) => tokio::time::sleep(timeout).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    let mut received = 0usize;
    loop {
        let remaining = options.max_messages.map(|max| max.saturating_sub(received));
        if remaining == Some(0) {
            info!("Received the requested {} message(s)", received);
            break;
        }
        let batch_size = match remaining {
            Some(remaining) => options.batch_size.min(u32::try_from(remaining).unwrap_or(u32::MAX)),
            None => options.batch_size,
        }
        .max(1);

        let batch = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Receive on {} cancelled", path);
                break;
            }
            _ = &mut deadline => {
                info!("Timeout elapsed, cancelling receive on {}", path);
                cancel.cancel();
                break;
            }
            batch = api.pull(&path, batch_size) => batch?,
        };

        for message in batch {
            callback(&message.message);
            api.acknowledge(&path, std::slice::from_ref(&message.ack_id)).await?;
            debug!("Acknowledged message {}", message.message.message_id);
            received += 1;
        }
    }

    Ok(received)
}
