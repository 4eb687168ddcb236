//! HTTP mail API gateway - posts messages as JSON to a transactional mail service.

use async_trait::async_trait;

use blog_core::error::MailError;
use blog_core::ports::{Mailer, OutgoingMail};

/// HTTP mail API configuration.
#[derive(Debug, Clone)]
pub struct HttpMailerConfig {
    /// Endpoint that accepts `{from, to, subject, text}` JSON.
    pub api_url: String,
    /// Sent as a Bearer token when present.
    pub api_key: Option<String>,
}

/// Mailer backed by an HTTP mail API.
///
/// A single POST per message; non-2xx responses become
/// [`MailError::Rejected`] and network failures [`MailError::Transport`].
pub struct HttpMailer {
    config: HttpMailerConfig,
    client: reqwest::Client,
}

impl HttpMailer {
    pub fn new(config: HttpMailerConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let payload = serde_json::json!({
            "from": mail.from,
            "to": mail.to,
            "subject": mail.subject,
            "text": mail.body,
        });

        let mut request = self.client.post(&self.config.api_url).json(&payload);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Mail API rejected message");
            return Err(MailError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        tracing::debug!(to = %mail.masked_recipients(), "Mail accepted by API");
        Ok(())
    }
}
