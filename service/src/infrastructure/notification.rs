use anyhow::Context;

use crate::domain::notification::{NotificationRequest, Notifier};
use crate::infrastructure::settings::MailerSettings;

/// Delivers notifications through a REST mail API
/// (`POST {api_url}` with a bearer key and a JSON body).
#[derive(Clone)]
pub struct RestMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    sender: String,
}

impl RestMailer {
    pub fn new(settings: &MailerSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
            sender: settings.sender.clone(),
        }
    }
}

impl Notifier for RestMailer {
    async fn send(&self, request: NotificationRequest) -> Result<(), anyhow::Error> {
        let payload = serde_json::json!({
            "from": self.sender,
            "to": [request.to.to_string()],
            "subject": request.subject,
            "html": request.html_body,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("failed to reach the mail API")?;

        response
            .error_for_status()
            .context("mail API rejected the message")?;

        tracing::debug!(to = %request.to, "notification delivered");
        Ok(())
    }
}
