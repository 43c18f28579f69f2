use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Topic with the subscriptions to attach to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSpec {
    pub name: String,
    #[serde(default)]
    pub subscriptions: Vec<String>,
}

/// One resource creation derived from a topology, in issue order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateRequest {
    Topic { topic: String },
    Subscription { topic: String, subscription: String },
}

/// Message attributes, kept sorted so output is stable
pub type Attributes = BTreeMap<String, String>;

/// A message delivered by a pull
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubSubMessage {
    pub message_id: String,
    pub data: Bytes,
    pub attributes: Attributes,
    pub publish_time: Option<String>,
}

impl fmt::Display for PubSubMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Message {{ message_id: {}, data: {:?}, attributes: {:?}, publish_time: {} }}",
            self.message_id,
            String::from_utf8_lossy(&self.data),
            self.attributes,
            self.publish_time.as_deref().unwrap_or("-"),
        )
    }
}

/// Pulled message together with the id needed to acknowledge it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub ack_id: String,
    pub message: PubSubMessage,
}
