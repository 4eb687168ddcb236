//! In-memory outbox - records every message it is asked to send.

use async_trait::async_trait;
use tokio::sync::Mutex;

use blog_core::error::MailError;
use blog_core::ports::{Mailer, OutgoingMail};

pub struct InMemoryMailer {
    outbox: Mutex<Vec<OutgoingMail>>,
    failure: Option<String>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self {
            outbox: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// A mailer whose transport always fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outbox: Mutex::new(Vec::new()),
            failure: Some(reason.into()),
        }
    }

    /// Messages accepted so far, oldest first.
    pub async fn sent(&self) -> Vec<OutgoingMail> {
        self.outbox.lock().await.clone()
    }
}

impl Default for InMemoryMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        if let Some(reason) = &self.failure {
            return Err(MailError::Transport(reason.clone()));
        }
        self.outbox.lock().await.push(mail);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail() -> OutgoingMail {
        OutgoingMail {
            from: "noreply@blog.local".to_string(),
            to: vec!["bob@example.com".to_string()],
            subject: "Hi".to_string(),
            body: "Hello".to_string(),
        }
    }

    #[tokio::test]
    async fn test_records_sent_mail() {
        let mailer = InMemoryMailer::new();
        mailer.send(mail()).await.unwrap();
        mailer.send(mail()).await.unwrap();
        assert_eq!(mailer.sent().await.len(), 2);
    }

    #[tokio::test]
    async fn test_failing_mailer_keeps_outbox_empty() {
        let mailer = InMemoryMailer::failing("smtp down");
        let err = mailer.send(mail()).await.unwrap_err();
        assert!(matches!(err, MailError::Transport(reason) if reason == "smtp down"));
        assert!(mailer.sent().await.is_empty());
    }
}
