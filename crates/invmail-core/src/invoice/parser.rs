//! Layout-driven invoice parser.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::invoice::{Field, InvoiceRecord};

use super::rules::{AmountFormat, FieldExtractor, LabeledField};
use super::Result;

/// Trait for invoice parsers, one implementation per invoice layout.
pub trait InvoiceParser: Send + Sync {
    /// Registry name of the layout (lowercase).
    fn name(&self) -> &'static str;

    /// Short human-readable description, shown in `--help`.
    fn description(&self) -> &'static str;

    /// Extract the invoice record from the full text of the PDF.
    fn extract_info(&self, text: &str) -> Result<InvoiceRecord>;
}

/// Parser built from one labelled extractor per required field.
pub struct LayoutParser {
    name: &'static str,
    description: &'static str,
    invoice_number: LabeledField,
    order_number: LabeledField,
    total_amount: LabeledField,
    amount_format: AmountFormat,
}

impl LayoutParser {
    pub fn new(
        name: &'static str,
        description: &'static str,
        invoice_number: LabeledField,
        order_number: LabeledField,
        total_amount: LabeledField,
    ) -> Self {
        debug_assert_eq!(invoice_number.field(), Field::InvoiceNumber);
        debug_assert_eq!(order_number.field(), Field::OrderNumber);
        debug_assert_eq!(total_amount.field(), Field::TotalAmount);

        Self {
            name,
            description,
            invoice_number,
            order_number,
            total_amount,
            amount_format: AmountFormat::Auto,
        }
    }

    /// Separator convention used to read this layout's totals.
    pub fn with_amount_format(mut self, format: AmountFormat) -> Self {
        self.amount_format = format;
        self
    }

    fn require(&self, extractor: &LabeledField, text: &str) -> Result<String> {
        let found = extractor
            .extract(text)
            .ok_or(ExtractionError::MissingField {
                parser: self.name,
                field: extractor.field(),
            })?;

        debug!(
            "{}: {} = '{}' (matched '{}' at {:?})",
            self.name,
            extractor.field(),
            found.value,
            found.source.trim(),
            found.position
        );
        Ok(found.value)
    }
}

impl InvoiceParser for LayoutParser {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn extract_info(&self, text: &str) -> Result<InvoiceRecord> {
        let start = Instant::now();

        if text.trim().is_empty() {
            return Err(ExtractionError::NoData);
        }

        let invoice_number = self.require(&self.invoice_number, text)?;
        let order_number = self.require(&self.order_number, text)?;
        let total_amount = self.require(&self.total_amount, text)?;

        let record = InvoiceRecord::new(
            &invoice_number,
            &order_number,
            &total_amount,
            self.amount_format,
        )?;

        info!(
            "Extracted invoice {} for order {} in {}us",
            record.invoice_number,
            record.order_number,
            start.elapsed().as_micros()
        );
        Ok(record)
    }
}
