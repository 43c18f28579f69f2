use chrono::{DateTime, SecondsFormat, Utc};
use log::info;

use crate::error::Result;
use crate::pubsub::api::PubSubApi;
use crate::pubsub::paths::subscription_path;

/// Seeks a subscription to the current time, so every message published
/// before now counts as acknowledged. Returns the timestamp used.
pub async fn reset<A: PubSubApi>(api: &A, project_id: &str, subscription_id: &str) -> Result<String> {
    reset_to(api, project_id, subscription_id, Utc::now()).await
}

pub async fn reset_to<A: PubSubApi>(api: &A, project_id: &str, subscription_id: &str, time: DateTime<Utc>) -> Result<String> {
    let path = subscription_path(project_id, subscription_id);
    let time = time.to_rfc3339_opts(SecondsFormat::Nanos, true);

    api.seek(&path, &time).await?;
    info!("Subscription {} reset to {}", path, time);
    Ok(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pubsub::api::fake::{Call, RecordingApi};
    use chrono::TimeZone;

    #[tokio::test]
    async fn seeks_to_given_time() {
        let api = RecordingApi::default();
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();

        let used = reset_to(&api, "p", "s", time).await.unwrap();

        assert_eq!(used, "2024-05-01T12:30:00.000000000Z");
        assert_eq!(
            api.calls(),
            vec![Call::Seek { subscription: "projects/p/subscriptions/s".into(), time: used }]
        );
    }

    #[tokio::test]
    async fn reset_uses_current_time() {
        let api = RecordingApi::default();
        let before = Utc::now();

        let used = reset(&api, "p", "s").await.unwrap();

        let parsed = DateTime::parse_from_rfc3339(&used).unwrap().with_timezone(&Utc);
        assert!(parsed >= before);
    }
}
