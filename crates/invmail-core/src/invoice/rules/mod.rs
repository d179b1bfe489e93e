//! Rule-based field extractors shared by the invoice layouts.

pub mod amounts;
pub mod patterns;

pub use amounts::{AmountFormat, parse_amount};
pub use patterns::*;

use regex::Regex;

use crate::models::invoice::Field;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A value found in the invoice text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range of the whole labelled match in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Extracts one field by trying label patterns in order.
///
/// The first pattern that matches anywhere in the text wins, so layouts list
/// their most specific label first.
pub struct LabeledField {
    field: Field,
    patterns: Vec<&'static Regex>,
}

impl LabeledField {
    pub fn new(field: Field, patterns: Vec<&'static Regex>) -> Self {
        Self { field, patterns }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    fn capture(pattern: &Regex, caps: regex::Captures<'_>) -> Option<ExtractionMatch<String>> {
        let whole = caps.get(0)?;
        let value = caps.get(1)?.as_str().trim();
        if value.is_empty() {
            tracing::trace!("Pattern {} matched an empty value", pattern.as_str());
            return None;
        }
        Some(
            ExtractionMatch::new(value.to_string(), whole.as_str())
                .with_position(whole.start(), whole.end()),
        )
    }
}

impl FieldExtractor for LabeledField {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.patterns.iter().find_map(|pattern| {
            pattern
                .captures_iter(text)
                .find_map(|caps| Self::capture(pattern, caps))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pattern_wins() {
        let extractor = LabeledField::new(
            Field::OrderNumber,
            vec![&*DOUGS_ORDER_NUMBER, &*DOUGS_EN_ORDER_NUMBER],
        );
        let text = "Order: EN-1\nCommande FR-2";

        let found = extractor.extract(text).unwrap();
        assert_eq!(found.value, "FR-2");
        assert_eq!(found.source, "Commande FR-2");
        assert_eq!(found.position, Some((12, 25)));
    }

    #[test]
    fn test_total_capture_ends_on_a_digit() {
        let extractor = LabeledField::new(Field::TotalAmount, vec![&*DOUGS_EN_TOTAL]);
        let found = extractor.extract("Total: 150.00, paid by card").unwrap();
        assert_eq!(found.value, "150.00");
    }

    #[test]
    fn test_no_match() {
        let extractor = LabeledField::new(Field::InvoiceNumber, vec![&*DOUGS_INVOICE_NUMBER]);
        assert!(extractor.extract("nothing to see").is_none());
        assert_eq!(extractor.field(), Field::InvoiceNumber);
    }
}
