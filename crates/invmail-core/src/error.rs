//! Error types for the invmail-core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::invoice::Field;

/// Main error type for the invmail library.
#[derive(Error, Debug)]
pub enum InvmailError {
    /// Mail configuration or order mapping error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Invoice field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Recipient lookup error.
    #[error("recipient error: {0}")]
    Recipient(#[from] RecipientError),

    /// Template rendering error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Mail dispatch error.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Errors raised while loading the mail configuration or the order mapping.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The INI file could not be parsed.
    #[error("malformed INI file {}: {reason}", path.display())]
    Ini { path: PathBuf, reason: String },

    #[error("missing section [{0}]")]
    MissingSection(String),

    #[error("missing key '{key}' in section [{section}]")]
    MissingKey { section: String, key: String },

    /// A key is present but its value is unusable.
    #[error("invalid value '{value}' for '{key}' in section [{section}]: {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// A line of the order mapping file is malformed.
    #[error("order mapping line {line}: {reason}")]
    Mapping { line: usize, reason: String },
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("PDF file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read PDF file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to invoice field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No parser is registered under the requested name.
    #[error("unknown parser '{name}' (available: {})", available.join(", "))]
    UnknownParser { name: String, available: Vec<String> },

    /// Required field is missing.
    #[error("{parser} parser: missing required field {field}")]
    MissingField { parser: &'static str, field: Field },

    /// Failed to parse a value.
    #[error("failed to parse {field}: '{value}'")]
    Parse { field: Field, value: String },

    /// No invoice data could be extracted.
    #[error("no invoice text to parse")]
    NoData,
}

/// Errors raised while resolving the recipients of an order.
#[derive(Error, Debug)]
pub enum RecipientError {
    #[error("order {0} has no entry in the order mapping")]
    UnknownOrder(String),

    /// Every address listed for the order failed validation.
    #[error("no valid recipient address for order {0}")]
    NoValidRecipient(String),
}

/// Errors raised while rendering a subject or body template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template references a placeholder the invoice record does not provide.
    #[error("unknown placeholder {{{name}}}")]
    UnknownField { name: String },

    /// Unbalanced brace at the given byte offset.
    #[error("unbalanced brace at offset {position}")]
    Malformed { position: usize },
}

/// Errors raised while previewing or sending the email.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("invalid email address '{address}': {reason}")]
    Address { address: String, reason: String },

    /// The MIME message could not be assembled.
    #[error("failed to build message: {0}")]
    Build(String),

    /// Connection, authentication or send failure.
    #[error("SMTP error: {0}")]
    Transport(String),

    #[error("failed to write preview: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the invmail library.
pub type Result<T> = std::result::Result<T, InvmailError>;
