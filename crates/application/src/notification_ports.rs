//! Ports for outbound notifications and message localization.

use std::sync::Arc;

use async_trait::async_trait;

use warden_core::AppResult;

/// File attached to an outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    /// File name shown to the recipient.
    pub file_name: String,
    /// MIME type, for example `image/png`.
    pub content_type: String,
    /// Raw file bytes.
    pub content: Vec<u8>,
}

/// Outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text_body: String,
    /// Optional attachments.
    pub attachments: Vec<EmailAttachment>,
}

/// Port for sending emails. Infrastructure provides SMTP or console implementations.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Sends an email.
    async fn send_email(&self, message: &EmailMessage) -> AppResult<()>;
}

/// Message lookup bound to one language.
pub trait Localizer: Send + Sync {
    /// Returns the language tag the localizer resolved to.
    fn language_tag(&self) -> &str;

    /// Returns the message for `key`, or the key itself when it is unknown.
    fn message(&self, key: &str) -> String;
}

/// Port resolving a localizer for a language tag.
pub trait Localization: Send + Sync {
    /// Returns a localizer for the tag, falling back to the default language
    /// when the tag is well-formed but unsupported.
    fn localizer(&self, language_tag: &str) -> AppResult<Arc<dyn Localizer>>;
}

/// Substitutes `{name}` placeholders in a localized template.
#[must_use]
pub fn render_message(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_owned(), |rendered, (name, value)| {
            rendered.replace(&format!("{{{name}}}"), value)
        })
}

#[cfg(test)]
mod tests {
    use super::render_message;

    #[test]
    fn render_message_replaces_every_placeholder() {
        let rendered = render_message(
            "Open {link} before {expires_at}. {link}",
            &[("link", "https://x.ut/r"), ("expires_at", "noon")],
        );
        assert_eq!(rendered, "Open https://x.ut/r before noon. https://x.ut/r");
    }

    #[test]
    fn unknown_placeholders_are_left_untouched() {
        assert_eq!(render_message("Hi {name}", &[]), "Hi {name}");
    }
}
