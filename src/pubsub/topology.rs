use log::debug;

use crate::error::{ErrorCode, ProvisionError, Result};
use crate::pubsub::types::{CreateRequest, TopicSpec};

/// Parses a JSON array of `{"name": ..., "subscriptions": [...]}` objects
pub fn parse_topology(json: &str) -> Result<Vec<TopicSpec>> {
    let topics: Vec<TopicSpec> = serde_json::from_str(json)
        .map_err(|e| ProvisionError::new(ErrorCode::MalformedTopology, format!("Failed to parse JSON: {}", e)))?;

    debug!("Parsed {} topic(s) from configuration", topics.len());
    Ok(topics)
}

/// Lists the creations for a topology: each topic, then its subscriptions
pub fn plan(topics: &[TopicSpec]) -> Vec<CreateRequest> {
    let mut requests = Vec::with_capacity(topics.iter().map(|t| 1 + t.subscriptions.len()).sum());
    for topic in topics {
        requests.push(CreateRequest::Topic { topic: topic.name.clone() });
        for subscription in &topic.subscriptions {
            requests.push(CreateRequest::Subscription {
                topic: topic.name.clone(),
                subscription: subscription.clone(),
            });
        }
    }
    requests
}
