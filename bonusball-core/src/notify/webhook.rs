use crate::error::{BonusBallError, Result};
use crate::notify::Notifier;
use crate::types::Announcement;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PushPayload<'a> {
    title: &'a str,
    body: &'a str,
}

/// Posts `{"title", "body"}` to a push relay that fans out to subscribers.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn notify(&self, announcement: &Announcement) -> Result<()> {
        let payload = PushPayload {
            title: &announcement.title,
            body: &announcement.body,
        };

        let response = self.client.post(&self.url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(BonusBallError::notify(format!(
                "Push relay returned {}",
                response.status()
            )));
        }

        tracing::info!("Announcement #{} pushed to {}", announcement.id, self.url);
        Ok(())
    }
}
