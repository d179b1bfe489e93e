//! Process-wide registry of invoice parsers.
//!
//! The registry is built on first use and never mutated afterwards. Adding a
//! layout means adding a constructor to [`super::layouts`] and listing it here.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::invoice::InvoiceRecord;

use super::layouts;
use super::parser::InvoiceParser;
use super::Result;

/// Parser used when none is requested.
pub const DEFAULT_PARSER: &str = "dougs";

lazy_static! {
    static ref REGISTRY: BTreeMap<&'static str, Box<dyn InvoiceParser>> = {
        let parsers: Vec<Box<dyn InvoiceParser>> = vec![
            Box::new(layouts::dougs()),
            Box::new(layouts::alternate()),
        ];
        parsers.into_iter().map(|p| (p.name(), p)).collect()
    };
}

/// Names of all registered parsers, sorted.
pub fn parser_names() -> Vec<&'static str> {
    REGISTRY.keys().copied().collect()
}

/// Look up a parser by name (case-insensitive).
pub fn get_parser(name: &str) -> Result<&'static dyn InvoiceParser> {
    let key = name.trim().to_lowercase();
    REGISTRY
        .get(key.as_str())
        .map(|parser| parser.as_ref())
        .ok_or_else(|| ExtractionError::UnknownParser {
            name: name.to_string(),
            available: parser_names().into_iter().map(String::from).collect(),
        })
}

/// Extract an invoice record from raw PDF text using the named parser.
pub fn extract(parser_name: &str, raw_text: &str) -> Result<InvoiceRecord> {
    let parser = get_parser(parser_name)?;
    debug!("Parsing {} characters with the {} parser", raw_text.len(), parser.name());
    parser.extract_info(raw_text)
}
