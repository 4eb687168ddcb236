//! Mail gateway port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MailError;

/// A plain-text message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    /// Recipients with local parts masked, for logging.
    pub fn masked_recipients(&self) -> String {
        self.to
            .iter()
            .map(|addr| mask_email(addr))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Mailer trait - abstraction over mail transports.
///
/// Implementations deliver at most once per call and never retry.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Mask an email address to keep PII out of logs: `ann@example.com` -> `a***@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{}***", first),
                _ => "***".to_string(),
            };
            format!("{}{}", masked_local, domain)
        }
        None => "***".to_string(),
    }
}
