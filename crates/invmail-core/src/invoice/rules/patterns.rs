//! Regex patterns for the supported invoice layouts.
//!
//! Every pattern captures the field value in group 1.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Dougs (French export)
    pub static ref DOUGS_INVOICE_NUMBER: Regex = Regex::new(
        r"Facture n°\s*([0-9]{4}-[0-9]{2}-FAC\s*\d+)"
    ).unwrap();

    pub static ref DOUGS_ORDER_NUMBER: Regex = Regex::new(
        r"Commande\s+([A-Z0-9\-]+)"
    ).unwrap();

    pub static ref DOUGS_TOTAL: Regex = Regex::new(
        r"Total TTC\s*(?:à régler)?\s*([\d\s.,]+?)\s*€"
    ).unwrap();

    // Dougs (English export)
    pub static ref DOUGS_EN_INVOICE_NUMBER: Regex = Regex::new(
        r"Invoice\s+No\b\.?\s*:?[ \t]*([A-Za-z0-9][A-Za-z0-9/\-_.]*)"
    ).unwrap();

    pub static ref DOUGS_EN_ORDER_NUMBER: Regex = Regex::new(
        r"\bOrder\s*:[ \t]*([A-Z0-9\-]+)"
    ).unwrap();

    pub static ref DOUGS_EN_TOTAL: Regex = Regex::new(
        r"\bTotal\s*:[ \t]*(\d(?:[\d \u{00a0}.,]*\d)?)"
    ).unwrap();

    // Alternate (US-style layout)
    pub static ref ALT_INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)\bInvoice\s*(?:#|Number\b|No\b\.?)\s*:?[ \t]*([A-Z0-9][A-Z0-9/\-_]*)"
    ).unwrap();

    pub static ref ALT_ORDER_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:Purchase\s+Order|PO|Order)\s*(?:#|Number\b|No\b\.?)\s*:?[ \t]*([A-Z0-9][A-Z0-9\-]*)"
    ).unwrap();

    pub static ref ALT_TOTAL: Regex = Regex::new(
        r"(?i)\b(?:Amount\s+Due|Balance\s+Due|Grand\s+Total)\s*:?[ \t]*(?:USD|EUR|\$|€)?[ \t]*(\d(?:[\d,]*\d)?(?:\.\d{1,2})?)"
    ).unwrap();

    // Recipient address shape (local@domain.tld)
    pub static ref EMAIL_ADDRESS: Regex = Regex::new(
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"
    ).unwrap();
}
