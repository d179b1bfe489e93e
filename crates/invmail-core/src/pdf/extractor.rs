//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// Extracts the text layer of an invoice PDF.
///
/// lopdf validates the document and removes empty-password encryption;
/// pdf-extract then reads the text from the (possibly decrypted) bytes.
#[derive(Default)]
pub struct PdfExtractor {
    text_source: Option<Vec<u8>>,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes pdf-extract can read. Invoices exported with owner-only
    /// protection open with an empty user password; anything else is refused.
    fn unlock(document: &mut Document, data: &[u8]) -> Result<Vec<u8>> {
        if !document.is_encrypted() {
            return Ok(data.to_vec());
        }

        document.decrypt("").map_err(|e| {
            debug!("Empty user password rejected: {}", e);
            PdfError::Encrypted
        })?;

        let mut plain = Vec::with_capacity(data.len());
        document
            .save_to(&mut plain)
            .map_err(|e| PdfError::Parse(format!("cannot rewrite decrypted PDF: {e}")))?;
        debug!("Removed empty-password encryption");
        Ok(plain)
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut document =
            Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;
        let text_source = Self::unlock(&mut document, data)?;

        let pages = document.get_pages().len();
        if pages == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} page(s)", pages);
        self.text_source = Some(text_source);
        Ok(())
    }

    fn extract_text(&self) -> Result<String> {
        let source = self
            .text_source
            .as_deref()
            .ok_or_else(|| PdfError::Parse("no document loaded".to_string()))?;
        let text = pdf_extract::extract_text_from_mem(source)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        debug!("Extracted {} characters of text", text.len());
        Ok(text)
    }
}
