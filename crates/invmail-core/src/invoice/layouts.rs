//! Supported invoice layouts.

use crate::models::invoice::Field;

use super::parser::LayoutParser;
use super::rules::patterns::*;
use super::rules::{AmountFormat, LabeledField};

/// Invoices exported by the Dougs accounting service.
///
/// French labels (`Facture n°`, `Commande`, `Total TTC ... €`) are tried
/// first, then the English export (`Invoice No:`, `Order:`, `Total:`).
pub fn dougs() -> LayoutParser {
    LayoutParser::new(
        "dougs",
        "Dougs accounting export (French or English labels)",
        LabeledField::new(
            Field::InvoiceNumber,
            vec![&*DOUGS_INVOICE_NUMBER, &*DOUGS_EN_INVOICE_NUMBER],
        ),
        LabeledField::new(
            Field::OrderNumber,
            vec![&*DOUGS_ORDER_NUMBER, &*DOUGS_EN_ORDER_NUMBER],
        ),
        LabeledField::new(Field::TotalAmount, vec![&*DOUGS_TOTAL, &*DOUGS_EN_TOTAL]),
    )
}

/// US-style invoices: `Invoice #`, `PO Number`, `Amount Due $1,234.56`.
///
/// Commas in totals always group thousands.
pub fn alternate() -> LayoutParser {
    LayoutParser::new(
        "alternate",
        "US-style layout (Invoice #, PO Number, Amount Due)",
        LabeledField::new(Field::InvoiceNumber, vec![&*ALT_INVOICE_NUMBER]),
        LabeledField::new(Field::OrderNumber, vec![&*ALT_ORDER_NUMBER]),
        LabeledField::new(Field::TotalAmount, vec![&*ALT_TOTAL]),
    )
    .with_amount_format(AmountFormat::CommaGrouping)
}
