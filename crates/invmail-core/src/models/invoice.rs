//! Invoice record produced by the field parsers.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::invoice::rules::amounts::{AmountFormat, parse_amount};

/// Fields every invoice record must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    InvoiceNumber,
    OrderNumber,
    TotalAmount,
}

impl Field {
    /// Name used in templates, logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::InvoiceNumber => "invoice_number",
            Field::OrderNumber => "order_number",
            Field::TotalAmount => "total_amount",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured fields extracted from the text of one invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice number as printed.
    pub invoice_number: String,

    /// Order number, used as the key into the order mapping.
    pub order_number: String,

    /// Total amount as printed on the invoice (e.g. `1 234,56`).
    pub total_amount: String,

    /// Parsed value of `total_amount`.
    pub total_value: Decimal,
}

impl InvoiceRecord {
    /// Build a record from raw captures, normalising whitespace and
    /// validating that every field is present and the total is numeric
    /// under the layout's `format`.
    pub fn new(
        invoice_number: &str,
        order_number: &str,
        total_amount: &str,
        format: AmountFormat,
    ) -> Result<Self, ExtractionError> {
        let invoice_number = non_empty(Field::InvoiceNumber, invoice_number)?;
        let order_number = non_empty(Field::OrderNumber, order_number)?;
        let total_amount = non_empty(Field::TotalAmount, total_amount)?;

        let total_value = parse_amount(&total_amount, format).ok_or_else(|| ExtractionError::Parse {
            field: Field::TotalAmount,
            value: total_amount.clone(),
        })?;

        Ok(Self {
            invoice_number,
            order_number,
            total_amount,
            total_value,
        })
    }

    /// Look up the text substituted for a template placeholder.
    ///
    /// `total_ttc` is accepted as an alias of `total_amount` so templates
    /// written for French invoices keep working.
    pub fn placeholder(&self, name: &str) -> Option<String> {
        match name {
            "invoice_number" => Some(self.invoice_number.clone()),
            "order_number" => Some(self.order_number.clone()),
            "total_amount" | "total_ttc" => Some(self.total_amount.clone()),
            "total_value" => Some(self.total_value.to_string()),
            _ => None,
        }
    }
}

/// Collapse whitespace runs (including line breaks left by PDF extraction)
/// into single spaces and reject empty values.
fn non_empty(field: Field, value: &str) -> Result<String, ExtractionError> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(ExtractionError::Parse {
            field,
            value: value.to_string(),
        });
    }
    Ok(collapsed)
}
