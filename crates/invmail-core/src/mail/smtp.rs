//! SMTP backend using lettre.

use lettre::message::header::ContentType;
use lettre::message::{Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, info};

use super::{DispatchResult, Mailer, OutgoingMail};
use crate::error::DispatchError;
use crate::models::config::{SmtpSettings, TlsMode};

/// Sends messages through an authenticated SMTP relay.
///
/// A new connection is opened for every message and closed once the
/// transport is dropped.
pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    fn transport(&self) -> Result<SmtpTransport, DispatchError> {
        let s = &self.settings;
        let builder = match s.security {
            TlsMode::StartTls => SmtpTransport::starttls_relay(&s.server)
                .map_err(|e| DispatchError::Transport(e.to_string()))?,
            TlsMode::Tls => SmtpTransport::relay(&s.server)
                .map_err(|e| DispatchError::Transport(e.to_string()))?,
            TlsMode::None => SmtpTransport::builder_dangerous(&s.server),
        };

        let mut builder = builder.port(s.port).timeout(Some(s.timeout));
        if !s.user.is_empty() {
            builder = builder.credentials(Credentials::new(s.user.clone(), s.password.clone()));
        }

        debug!(
            "SMTP transport {}:{} ({:?}, timeout {:?})",
            s.server, s.port, s.security, s.timeout
        );
        Ok(builder.build())
    }
}

/// Assemble the MIME message: plain-text body plus the PDF attachment.
pub(crate) fn build_message(mail: &OutgoingMail) -> Result<Message, DispatchError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&mail.from)?)
        .subject(mail.subject.clone());
    for recipient in &mail.to {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    let pdf = ContentType::parse("application/pdf")
        .map_err(|e| DispatchError::Build(e.to_string()))?;
    let attachment = MimeAttachment::new(mail.attachment.filename.clone())
        .body(mail.attachment.content.clone(), pdf);

    builder
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(mail.body.clone()))
                .singlepart(attachment),
        )
        .map_err(|e| DispatchError::Build(e.to_string()))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DispatchError> {
    address.parse::<Mailbox>().map_err(|e| DispatchError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

impl Mailer for SmtpMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<DispatchResult, DispatchError> {
        let message = build_message(mail)?;
        let transport = self.transport()?;

        info!("Sending email to {} recipients", mail.to.len());
        let response = transport
            .send(&message)
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        info!("Email sent successfully to {} recipients", mail.to.len());
        Ok(DispatchResult::Sent {
            recipients: mail.to.len(),
            response: response.code().to_string(),
        })
    }
}
