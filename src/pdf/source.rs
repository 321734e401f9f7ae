// src/pdf/source.rs
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::pdf::models::FormText;
use crate::utils::error::ExtractError;

/// Produces the text of a document, one string per page in document order.
pub trait PageTextSource {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>, ExtractError>;
}

/// Reads PDFs from disk with the pure-Rust `pdf-extract` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractSource;

impl PdfExtractSource {
    pub fn new() -> Self { Self {} }

    /// Extracts per-page text from PDF bytes already in memory.
    pub fn pages_from_bytes(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
        // pdf-extract panics on some malformed streams instead of returning an error
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }));

        match outcome {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(ExtractError::Parse(e.to_string())),
            Err(_) => Err(ExtractError::Parse("PDF extractor panicked on malformed input".to_string())),
        }
    }
}

impl PageTextSource for PdfExtractSource {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        let bytes = std::fs::read(path)?;
        tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());

        let pages = self.pages_from_bytes(&bytes)?;
        tracing::debug!("Extracted text for {} pages from {}", pages.len(), path.display());
        Ok(pages)
    }
}

/// Loads the title and flattened line stream of one form.
pub fn load_form<S: PageTextSource + ?Sized>(source: &S, path: &Path) -> Result<FormText, ExtractError> {
    let pages = source.page_texts(path)?;
    let form = FormText::from_pages(&pages).ok_or(ExtractError::NoPages)?;
    tracing::debug!(
        "Loaded {} lines across {} pages from {}",
        form.lines.len(),
        form.page_count,
        path.display()
    );
    Ok(form)
}
