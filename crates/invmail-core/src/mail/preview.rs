//! Test-mode backend: renders the message instead of sending it.

use std::cell::RefCell;
use std::io::{self, Stdout, Write};

use chrono::Local;
use tracing::info;

use super::{DispatchResult, Mailer, OutgoingMail};
use crate::error::DispatchError;

const SEPARATOR_WIDTH: usize = 70;

/// Writes a human-readable rendering of each message to `W`.
pub struct PreviewMailer<W: Write> {
    out: RefCell<W>,
}

impl PreviewMailer<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> PreviewMailer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    /// Give back the writer, e.g. to inspect a `Vec<u8>` in tests.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    /// Build the text shown for a message.
    pub fn render(mail: &OutgoingMail) -> String {
        let separator = "-".repeat(SEPARATOR_WIDTH);
        format!(
            "{separator}\n\
             EMAIL PREVIEW\n\
             {separator}\n\
             From: {from}\n\
             To: {to}\n\
             Subject: {subject}\n\
             Date: {date}\n\
             {separator}\n\
             BODY:\n\
             {body}\n\
             {separator}\n\
             ATTACHMENTS:\n\
             - {filename} ({size} bytes)\n\
             {separator}\n",
            from = mail.from,
            to = mail.to.join(", "),
            subject = mail.subject,
            date = Local::now().to_rfc2822(),
            body = mail.body,
            filename = mail.attachment.filename,
            size = mail.attachment.content.len(),
        )
    }
}

impl<W: Write> Mailer for PreviewMailer<W> {
    fn send(&self, mail: &OutgoingMail) -> Result<DispatchResult, DispatchError> {
        let rendering = Self::render(mail);

        let mut out = self.out.borrow_mut();
        out.write_all(rendering.as_bytes())?;
        out.flush()?;

        info!("Previewed email to {} recipient(s), nothing sent", mail.to.len());
        Ok(DispatchResult::Previewed { rendering })
    }
}
