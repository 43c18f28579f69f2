use std::future::Future;

use bytes::Bytes;

use crate::error::Result;
use crate::pubsub::types::{Attributes, ReceivedMessage};

/// Operations of the Pub/Sub service used by this tool.
///
/// All names are fully qualified resource paths (see [`crate::pubsub::paths`]).
pub trait PubSubApi: Send + Sync {
    fn create_topic(&self, topic: &str) -> impl Future<Output = Result<()>> + Send;

    fn create_subscription(&self, subscription: &str, topic: &str) -> impl Future<Output = Result<()>> + Send;

    /// Publishes one message and returns the id assigned by the service
    fn publish(&self, topic: &str, data: Bytes, attributes: &Attributes) -> impl Future<Output = Result<String>> + Send;

    /// Pulls at most `max_messages`; an empty batch means nothing is pending
    fn pull(&self, subscription: &str, max_messages: u32) -> impl Future<Output = Result<Vec<ReceivedMessage>>> + Send;

    fn acknowledge(&self, subscription: &str, ack_ids: &[String]) -> impl Future<Output = Result<()>> + Send;

    /// Seeks a subscription to an RFC 3339 timestamp
    fn seek(&self, subscription: &str, time: &str) -> impl Future<Output = Result<()>> + Send;
}
