//! Data models shared across the pipeline.

pub mod config;
pub mod invoice;

pub use config::{MailConfig, SmtpSettings, TlsMode};
pub use invoice::{Field, InvoiceRecord};
