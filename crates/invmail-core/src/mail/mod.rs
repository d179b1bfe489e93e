//! Composing, previewing and sending the invoice email.
//!
//! Two backends implement [`Mailer`]:
//! - [`PreviewMailer`] - writes a readable rendering of the message, no network
//! - [`SmtpMailer`] - sends the message over SMTP using lettre

mod preview;
mod smtp;

pub use preview::PreviewMailer;
pub use smtp::SmtpMailer;

use std::fmt;

use crate::error::DispatchError;
use crate::models::config::MailConfig;

/// File attached to the outgoing email.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("bytes", &self.content.len())
            .finish()
    }
}

/// A fully composed email, ready to preview or send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachment: Attachment,
}

/// Outcome of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// Test mode: the rendering that was printed.
    Previewed { rendering: String },
    /// Live mode: the message was accepted by the SMTP server.
    Sent { recipients: usize, response: String },
}

/// Trait for email backends.
pub trait Mailer {
    /// Preview or deliver one message. Single attempt, no retry.
    fn send(&self, mail: &OutgoingMail) -> Result<DispatchResult, DispatchError>;
}

/// Preview the message on stdout in test mode, otherwise send it over SMTP.
pub fn send_or_preview(
    config: &MailConfig,
    mail: &OutgoingMail,
    test_mode: bool,
) -> Result<DispatchResult, DispatchError> {
    if test_mode {
        PreviewMailer::stdout().send(mail)
    } else {
        SmtpMailer::new(&config.smtp).send(mail)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_mail() -> OutgoingMail {
        OutgoingMail {
            from: "Billing <billing@example.com>".to_string(),
            to: vec!["a@x.com".to_string(), "b@x.com".to_string()],
            subject: "Invoice INV-001".to_string(),
            body: "Please find invoice INV-001 attached.\nTotal: 150.00".to_string(),
            attachment: Attachment::new("INV-001.pdf", b"%PDF-1.5 test".to_vec()),
        }
    }

    #[test]
    fn test_attachment_debug_hides_content() {
        let attachment = Attachment::new("a.pdf", vec![0; 2048]);
        assert_eq!(
            format!("{:?}", attachment),
            "Attachment { filename: \"a.pdf\", bytes: 2048 }"
        );
    }
}
