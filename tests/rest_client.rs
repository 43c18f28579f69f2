use std::io::Write;
use std::time::Duration;

use bytes::Bytes;
use mockito::Matcher;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use pubsub_provision::error::ErrorCode;
use pubsub_provision::pubsub::api::PubSubApi;
use pubsub_provision::pubsub::config::ClientConfig;
use pubsub_provision::pubsub::provision::create_topics_and_subscriptions;
use pubsub_provision::pubsub::publisher::publish;
use pubsub_provision::pubsub::receiver::{receive, ReceiveOptions};
use pubsub_provision::pubsub::reset::reset;
use pubsub_provision::pubsub::rest::RestClient;
use pubsub_provision::pubsub::types::Attributes;

fn client(server: &mockito::ServerGuard) -> RestClient {
    let config = ClientConfig { request_timeout_secs: 5, ..ClientConfig::default() };
    RestClient::new(server.url(), &config).expect("client")
}

#[tokio::test]
async fn create_issues_one_put_per_resource() {
    let mut server = mockito::Server::new_async().await;
    let topic = server
        .mock("PUT", "/v1/projects/my-gcp-project/topics/my-topic")
        .match_body(Matcher::Json(json!({})))
        .with_status(200)
        .with_body(r#"{"name": "projects/my-gcp-project/topics/my-topic"}"#)
        .expect(1)
        .create_async()
        .await;
    let subscription = server
        .mock("PUT", "/v1/projects/my-gcp-project/subscriptions/my-subscription")
        .match_body(Matcher::Json(json!({"topic": "projects/my-gcp-project/topics/my-topic"})))
        .with_status(200)
        .with_body(r#"{"name": "projects/my-gcp-project/subscriptions/my-subscription"}"#)
        .expect(1)
        .create_async()
        .await;

    let api = client(&server);
    let mut out = Vec::new();
    let created = create_topics_and_subscriptions(
        &api,
        &mut out,
        "my-gcp-project",
        r#"[{"name": "my-topic", "subscriptions": ["my-subscription"]}]"#,
    )
    .await
    .unwrap();

    assert_eq!(created, 2);
    topic.assert_async().await;
    subscription.assert_async().await;
}

#[tokio::test]
async fn existing_topic_is_reported_as_request_failure() {
    let mut server = mockito::Server::new_async().await;
    let _conflict = server
        .mock("PUT", "/v1/projects/p/topics/t")
        .with_status(409)
        .with_body(r#"{"error": {"code": 409, "message": "Topic already exists"}}"#)
        .create_async()
        .await;

    let err = client(&server).create_topic("projects/p/topics/t").await.unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::RequestFailed));
    assert!(err.message().contains("409"), "{}", err);
    assert!(err.message().contains("Topic already exists"), "{}", err);
}

#[tokio::test]
async fn publish_sends_base64_payload_and_returns_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/projects/p/topics/t:publish")
        .match_body(Matcher::Json(json!({"messages": [{"data": "aGVsbG8gd29ybGQ=", "attributes": {"origin": "it"}}]})))
        .with_status(200)
        .with_body(r#"{"messageIds": ["4711"]}"#)
        .create_async()
        .await;

    let mut attributes = Attributes::new();
    attributes.insert("origin".into(), "it".into());
    let mut out = Vec::new();

    let id = publish(&client(&server), &mut out, "p", "t", "hello world", &attributes).await.unwrap();

    assert_eq!(id, "4711");
    assert_eq!(String::from_utf8(out).unwrap(), "4711\n");
    mock.assert_async().await;
}

#[tokio::test]
async fn publish_without_message_id_is_unexpected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/projects/p/topics/t:publish")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let err = client(&server)
        .publish("projects/p/topics/t", Bytes::from_static(b"x"), &Attributes::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::UnexpectedResponse));
}

#[tokio::test]
async fn receive_pulls_and_acknowledges() {
    let mut server = mockito::Server::new_async().await;
    let pull = server
        .mock("POST", "/v1/projects/p/subscriptions/s:pull")
        .match_body(Matcher::Json(json!({"maxMessages": 1})))
        .with_status(200)
        .with_body(
            r#"{"receivedMessages": [{"ackId": "ack-1", "message": {"data": "cGluZw==", "messageId": "1", "publishTime": "2024-05-01T12:30:00Z"}}]}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let ack = server
        .mock("POST", "/v1/projects/p/subscriptions/s:acknowledge")
        .match_body(Matcher::Json(json!({"ackIds": ["ack-1"]})))
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let options = ReceiveOptions {
        timeout: Some(Duration::from_secs(5)),
        max_messages: Some(1),
        batch_size: 10,
    };
    let mut out = Vec::new();
    let mut payloads = Vec::new();

    let count = receive(&client(&server), &mut out, "p", "s", options, CancellationToken::new(), |m| {
        payloads.push(m.data.clone())
    })
    .await
    .unwrap();

    assert_eq!(count, 1);
    assert_eq!(payloads, vec![Bytes::from_static(b"ping")]);
    pull.assert_async().await;
    ack.assert_async().await;
}

#[tokio::test]
async fn reset_seeks_to_rfc3339_time() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/projects/p/subscriptions/s:seek")
        .match_body(Matcher::Regex(r#"\{"time":"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{9}Z"\}"#.into()))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    reset(&client(&server), "p", "s").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn idle_pull_past_request_timeout_is_empty_batch() {
    let mut server = mockito::Server::new_async().await;
    let _slow = server
        .mock("POST", "/v1/projects/p/subscriptions/s:pull")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_secs(3));
            w.write_all(b"{}")
        })
        .create_async()
        .await;

    let config = ClientConfig { request_timeout_secs: 1, ..ClientConfig::default() };
    let api = RestClient::new(server.url(), &config).unwrap();

    let batch = api.pull("projects/p/subscriptions/s", 10).await.unwrap();

    assert!(batch.is_empty());
}
