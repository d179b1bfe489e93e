//! Core library for mailing PDF invoices to the recipients of their order.
//!
//! This crate provides:
//! - PDF text extraction (lopdf + pdf-extract)
//! - Invoice field extraction through a registry of layout parsers
//! - Order number to recipient resolution
//! - Subject/body templating
//! - Email preview and SMTP delivery (lettre)
//! - A fail-fast pipeline tying the stages together

pub mod error;
pub mod invoice;
pub mod mail;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod recipients;
pub mod template;

pub use error::{InvmailError, Result};
pub use invoice::{DEFAULT_PARSER, InvoiceParser, extract, get_parser, parser_names};
pub use mail::{Attachment, DispatchResult, Mailer, OutgoingMail, PreviewMailer, SmtpMailer};
pub use models::{Field, InvoiceRecord, MailConfig, SmtpSettings, TlsMode};
pub use pdf::{InvoicePdf, PdfExtractor, PdfProcessor, read_invoice_pdf};
pub use pipeline::{Pipeline, PipelineError, PreparedMail, Stage};
pub use recipients::{OrderMapping, resolve};
