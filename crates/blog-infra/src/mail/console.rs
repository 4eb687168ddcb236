//! Console mailer - logs messages instead of delivering them (for development).

use async_trait::async_trait;

use blog_core::error::MailError;
use blog_core::ports::{Mailer, OutgoingMail};

pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::info!(
            from = %mail.from,
            to = %mail.masked_recipients(),
            subject = %mail.subject,
            "Mail (console backend, not delivered)"
        );
        tracing::debug!(body = %mail.body, "Mail body");
        Ok(())
    }
}
