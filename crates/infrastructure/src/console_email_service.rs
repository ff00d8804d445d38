//! Console email service for development. Logs emails to tracing output.

use async_trait::async_trait;
use tracing::info;
use warden_application::{EmailMessage, EmailService};
use warden_core::AppResult;

/// Development email service that logs emails instead of sending them.
#[derive(Clone, Default)]
pub struct ConsoleEmailService;

impl ConsoleEmailService {
    /// Creates a new console email service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailService for ConsoleEmailService {
    async fn send_email(&self, message: &EmailMessage) -> AppResult<()> {
        let attachment_names: Vec<&str> = message
            .attachments
            .iter()
            .map(|attachment| attachment.file_name.as_str())
            .collect();

        info!(
            to = %message.to,
            subject = %message.subject,
            attachments = ?attachment_names,
            "--- EMAIL (console) ---\nTo: {}\nSubject: {}\n\n{}\n--- END EMAIL ---",
            message.to,
            message.subject,
            message.text_body
        );

        Ok(())
    }
}
