//! PDF processing module.

mod extractor;

pub use extractor::PdfExtractor;

#[cfg(test)]
pub(crate) use extractor::tests::pdf_with_lines;

use std::path::Path;

use tracing::info;

use crate::error::PdfError;
use crate::mail::Attachment;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Extract text from the entire PDF, pages concatenated in order.
    fn extract_text(&self) -> Result<String>;
}

/// An invoice PDF read from disk: its text and the bytes to attach.
#[derive(Debug, Clone)]
pub struct InvoicePdf {
    pub text: String,
    pub attachment: Attachment,
}

/// Read a PDF once, extract its text and keep the bytes for the attachment.
pub fn read_invoice_pdf(path: &Path) -> Result<InvoicePdf> {
    if !path.exists() {
        return Err(PdfError::NotFound(path.to_path_buf()));
    }

    info!("Processing invoice from PDF: {}", path.display());
    let data = std::fs::read(path)?;

    let mut extractor = PdfExtractor::new();
    extractor.load(&data)?;
    let text = extractor.extract_text()?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "invoice.pdf".to_string());

    Ok(InvoicePdf {
        text,
        attachment: Attachment::new(filename, data),
    })
}
