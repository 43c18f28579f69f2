//! HTTP/JSON binding of [`PubSubApi`] against the `v1` REST surface.
//!
//! Works the same against the public service and the local emulator; no
//! credentials are attached to requests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use log::{debug, info};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, ProvisionError, Result};
use crate::pubsub::api::PubSubApi;
use crate::pubsub::config::ClientConfig;
use crate::pubsub::types::{Attributes, PubSubMessage, ReceivedMessage};

#[derive(Serialize)]
struct SubscriptionBody<'a> {
    topic: &'a str,
}

#[derive(Serialize)]
struct PublishBody<'a> {
    messages: [OutgoingMessage<'a>; 1],
}

#[derive(Serialize)]
struct OutgoingMessage<'a> {
    data: String,
    #[serde(skip_serializing_if = "no_attributes")]
    attributes: &'a Attributes,
}

fn no_attributes(attributes: &&Attributes) -> bool {
    attributes.is_empty()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    #[serde(default)]
    message_ids: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PullBody {
    max_messages: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullResponse {
    #[serde(default)]
    received_messages: Vec<WireReceivedMessage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReceivedMessage {
    ack_id: String,
    message: WireMessage,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage {
    #[serde(default)]
    data: String,
    #[serde(default)]
    attributes: Attributes,
    #[serde(default)]
    message_id: String,
    publish_time: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AcknowledgeBody<'a> {
    ack_ids: &'a [String],
}

#[derive(Serialize)]
struct SeekBody<'a> {
    time: &'a str,
}

impl TryFrom<WireReceivedMessage> for ReceivedMessage {
    type Error = ProvisionError;

    fn try_from(wire: WireReceivedMessage) -> Result<Self> {
        let data = STANDARD.decode(wire.message.data.as_bytes()).map_err(|e| {
            ProvisionError::new(
                ErrorCode::InvalidPayload,
                format!("Message {} carries invalid base64 data: {}", wire.message.message_id, e),
            )
        })?;

        Ok(ReceivedMessage {
            ack_id: wire.ack_id,
            message: PubSubMessage {
                message_id: wire.message.message_id,
                data: Bytes::from(data),
                attributes: wire.message.attributes,
                publish_time: wire.message.publish_time,
            },
        })
    }
}

/// REST client for the Pub/Sub service
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ProvisionError::new(ErrorCode::ConnectionFailed, format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Using Pub/Sub endpoint {}", base_url);
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, resource: &str, verb: Option<&str>) -> String {
        match verb {
            Some(verb) => format!("{}/v1/{}:{}", self.base_url, resource, verb),
            None => format!("{}/v1/{}", self.base_url, resource),
        }
    }

    async fn put<B: Serialize + ?Sized>(&self, resource: &str, body: &B) -> Result<Response> {
        let url = self.url(resource, None);
        debug!("PUT {}", url);
        let response = self.http.put(&url).json(body).send().await?;
        check_status(response).await
    }

    async fn post<B: Serialize + ?Sized>(&self, resource: &str, verb: &str, body: &B) -> Result<Response> {
        let url = self.url(resource, Some(verb));
        debug!("POST {}", url);
        let response = self.http.post(&url).json(body).send().await?;
        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    Err(ProvisionError::new(
        ErrorCode::RequestFailed,
        format!("{} returned {}: {}", url, status, body.trim()),
    ))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|e| ProvisionError::new(ErrorCode::UnexpectedResponse, format!("Failed to decode response: {}", e)))
}

impl PubSubApi for RestClient {
    async fn create_topic(&self, topic: &str) -> Result<()> {
        self.put(topic, &serde_json::json!({})).await?;
        Ok(())
    }

    async fn create_subscription(&self, subscription: &str, topic: &str) -> Result<()> {
        self.put(subscription, &SubscriptionBody { topic }).await?;
        Ok(())
    }

    async fn publish(&self, topic: &str, data: Bytes, attributes: &Attributes) -> Result<String> {
        let body = PublishBody {
            messages: [OutgoingMessage { data: STANDARD.encode(&data), attributes }],
        };
        let response: PublishResponse = decode(self.post(topic, "publish", &body).await?).await?;

        response.message_ids.into_iter().next().ok_or_else(|| {
            ProvisionError::new(ErrorCode::UnexpectedResponse, "Publish response contained no message id")
        })
    }

    async fn pull(&self, subscription: &str, max_messages: u32) -> Result<Vec<ReceivedMessage>> {
        let body = PullBody { max_messages };
        let pulled = match self.post(subscription, "pull", &body).await {
            Ok(response) => decode::<PullResponse>(response).await,
            Err(e) => Err(e),
        };
        let response = match pulled {
            Ok(response) => response,
            // an idle long poll can outlive the request timeout
            Err(ProvisionError::Http(e)) if e.is_timeout() => {
                debug!("Pull on {} timed out without messages", subscription);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        debug!("Pulled {} message(s) from {}", response.received_messages.len(), subscription);
        response.received_messages.into_iter().map(ReceivedMessage::try_from).collect()
    }

    async fn acknowledge(&self, subscription: &str, ack_ids: &[String]) -> Result<()> {
        if ack_ids.is_empty() {
            return Ok(());
        }
        self.post(subscription, "acknowledge", &AcknowledgeBody { ack_ids }).await?;
        Ok(())
    }

    async fn seek(&self, subscription: &str, time: &str) -> Result<()> {
        self.post(subscription, "seek", &SeekBody { time }).await?;
        Ok(())
    }
}
