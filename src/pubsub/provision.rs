use std::io::Write;

use log::{error, info};

use crate::error::Result;
use crate::pubsub::api::PubSubApi;
use crate::pubsub::paths::{subscription_path, topic_path};
use crate::pubsub::topology::{parse_topology, plan};
use crate::pubsub::types::CreateRequest;

/// Creates every topic and subscription named in `json_config`, in input order.
///
/// Malformed input is echoed to `out` before the parse error is returned, and
/// nothing is created. The first failed creation aborts the run.
pub async fn create_topics_and_subscriptions<A, W>(api: &A, out: &mut W, project_id: &str, json_config: &str) -> Result<usize>
where
    A: PubSubApi,
    W: Write,
{
    let topics = match parse_topology(json_config) {
        Ok(topics) => topics,
        Err(e) => {
            error!("❌ {}", e);
            writeln!(out, "Failed to parse JSON Pub/Sub configuration, please verify the input:")?;
            writeln!(out, "{}", json_config)?;
            return Err(e);
        }
    };

    let requests = plan(&topics);
    info!("Provisioning {} resource(s) in project {}", requests.len(), project_id);

    for request in &requests {
        match request {
            CreateRequest::Topic { topic } => {
                let path = topic_path(project_id, topic);
                api.create_topic(&path).await?;
                writeln!(out, "Topic created: {}", path)?;
            }
            CreateRequest::Subscription { topic, subscription } => {
                let path = subscription_path(project_id, subscription);
                api.create_subscription(&path, &topic_path(project_id, topic)).await?;
                writeln!(out, "Subscription created: {}", path)?;
            }
        }
    }

    info!("Provisioning completed");
    Ok(requests.len())
}
