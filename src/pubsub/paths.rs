/// Fully qualified topic name: `projects/{project}/topics/{topic}`
pub fn topic_path(project_id: &str, topic_id: &str) -> String {
    format!("projects/{}/topics/{}", project_id, topic_id)
}

/// Fully qualified subscription name: `projects/{project}/subscriptions/{subscription}`
pub fn subscription_path(project_id: &str, subscription_id: &str) -> String {
    format!("projects/{}/subscriptions/{}", project_id, subscription_id)
}
