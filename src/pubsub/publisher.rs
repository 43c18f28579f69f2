use std::io::Write;

use bytes::Bytes;
use log::info;

use crate::error::{ErrorCode, ProvisionError, Result};
use crate::pubsub::api::PubSubApi;
use crate::pubsub::paths::topic_path;
use crate::pubsub::types::Attributes;

/// Publishes `data` as one UTF-8 message and prints the assigned message id
pub async fn publish<A, W>(
    api: &A,
    out: &mut W,
    project_id: &str,
    topic_id: &str,
    data: &str,
    attributes: &Attributes,
) -> Result<String>
where
    A: PubSubApi,
    W: Write,
{
    let path = topic_path(project_id, topic_id);
    info!("Publishing {} byte(s) to {}", data.len(), path);

    let message_id = api.publish(&path, Bytes::copy_from_slice(data.as_bytes()), attributes).await?;
    writeln!(out, "{}", message_id)?;
    Ok(message_id)
}

/// Parses `key=value` pairs into message attributes
pub fn parse_attributes<S: AsRef<str>>(pairs: &[S]) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    for pair in pairs {
        let pair = pair.as_ref();
        match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                attributes.insert(key.to_string(), value.to_string());
            }
            _ => {
                return Err(ProvisionError::new(
                    ErrorCode::InvalidArgument,
                    format!("Attribute '{}' is not of the form key=value", pair),
                ))
            }
        }
    }
    Ok(attributes)
}
