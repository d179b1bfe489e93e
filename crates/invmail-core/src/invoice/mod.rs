//! Invoice field extraction module.

pub mod layouts;
mod parser;
mod registry;
pub mod rules;

pub use parser::{InvoiceParser, LayoutParser};
pub use registry::{DEFAULT_PARSER, extract, get_parser, parser_names};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
