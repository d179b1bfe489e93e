//! Fail-fast pipeline: extract fields, resolve recipients, render, dispatch.
//!
//! Every failure carries the [`Stage`] it happened in. Only a
//! [`PreparedMail`] can be dispatched, and one exists only once every earlier
//! stage succeeded, so a failed run never sends a partial message.

use std::fmt;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::error::InvmailError;
use crate::invoice::{self, InvoiceParser};
use crate::mail::{self, Attachment, DispatchResult, OutgoingMail};
use crate::models::config::MailConfig;
use crate::models::invoice::InvoiceRecord;
use crate::pdf::{self, InvoicePdf};
use crate::recipients::{self, OrderMapping};
use crate::template;

/// Named step of a run, used in failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadConfig,
    LoadMapping,
    SelectParser,
    ReadPdf,
    ExtractFields,
    ResolveRecipients,
    RenderTemplate,
    Dispatch,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::LoadConfig => "load mail config",
            Stage::LoadMapping => "load order mapping",
            Stage::SelectParser => "select parser",
            Stage::ReadPdf => "read PDF",
            Stage::ExtractFields => "extract fields",
            Stage::ResolveRecipients => "resolve recipients",
            Stage::RenderTemplate => "render template",
            Stage::Dispatch => "dispatch",
        };
        f.write_str(name)
    }
}

/// A failure tagged with the stage that produced it.
#[derive(Error, Debug)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: InvmailError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: impl Into<InvmailError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

/// Helper to tag any library error with a stage.
pub trait StageExt<T> {
    fn stage(self, stage: Stage) -> Result<T, PipelineError>;
}

impl<T, E: Into<InvmailError>> StageExt<T> for Result<T, E> {
    fn stage(self, stage: Stage) -> Result<T, PipelineError> {
        self.map_err(|e| PipelineError::new(stage, e))
    }
}

/// Record and message produced by the preparation stages.
#[derive(Debug, Clone)]
pub struct PreparedMail {
    pub record: InvoiceRecord,
    pub mail: OutgoingMail,
}

/// Load the mail configuration and order mapping once at startup.
pub fn load_inputs(
    mail_config: &Path,
    mapping: &Path,
) -> Result<(MailConfig, OrderMapping), PipelineError> {
    let config = MailConfig::from_file(mail_config).stage(Stage::LoadConfig)?;
    let mapping = OrderMapping::from_file(mapping).stage(Stage::LoadMapping)?;
    Ok((config, mapping))
}

/// One invoice run over a fixed configuration and mapping.
pub struct Pipeline<'a> {
    parser: &'static dyn InvoiceParser,
    config: &'a MailConfig,
    mapping: &'a OrderMapping,
}

impl<'a> Pipeline<'a> {
    /// Select the parser up front so an unknown name fails before any I/O.
    pub fn new(
        parser_name: &str,
        config: &'a MailConfig,
        mapping: &'a OrderMapping,
    ) -> Result<Self, PipelineError> {
        let parser = invoice::get_parser(parser_name).stage(Stage::SelectParser)?;
        debug!("Using the {} parser", parser.name());
        Ok(Self {
            parser,
            config,
            mapping,
        })
    }

    pub fn parser(&self) -> &'static dyn InvoiceParser {
        self.parser
    }

    /// Read the PDF once: text for the parser, bytes for the attachment.
    pub fn read_pdf(&self, path: &Path) -> Result<InvoicePdf, PipelineError> {
        pdf::read_invoice_pdf(path).stage(Stage::ReadPdf)
    }

    /// Run every stage up to, but not including, dispatch.
    pub fn prepare(&self, text: &str, attachment: Attachment) -> Result<PreparedMail, PipelineError> {
        let record = self.parser.extract_info(text).stage(Stage::ExtractFields)?;

        let to = recipients::resolve(&record.order_number, self.mapping)
            .stage(Stage::ResolveRecipients)?;

        let subject = template::render(&self.config.subject_template, &record)
            .stage(Stage::RenderTemplate)?;
        let body = template::render(&self.config.body_template, &record)
            .stage(Stage::RenderTemplate)?;

        Ok(PreparedMail {
            mail: OutgoingMail {
                from: self.config.from_address.clone(),
                to,
                subject,
                body,
                attachment,
            },
            record,
        })
    }

    /// Preview the prepared message in test mode, otherwise send it over SMTP.
    pub fn dispatch(
        &self,
        prepared: &PreparedMail,
        test_mode: bool,
    ) -> Result<DispatchResult, PipelineError> {
        let result =
            mail::send_or_preview(self.config, &prepared.mail, test_mode).stage(Stage::Dispatch)?;
        if let DispatchResult::Sent { .. } = result {
            info!(
                "Invoice {} for order {} sent",
                prepared.record.invoice_number, prepared.record.order_number
            );
        }
        Ok(result)
    }
}
