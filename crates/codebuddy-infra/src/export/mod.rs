//! Answer export: markdown to HTML and to PDF.
//!
//! The PDF path never surfaces an error to the learner: [`export_pdf`] turns
//! any failure into "no document" after logging it.

pub mod html;
pub mod pdf;

pub use html::{export_html_document, markdown_to_html};
pub use pdf::render_pdf;

use codebuddy_types::error::ExportError;

/// MIME type of the PDF download.
pub const PDF_MIME: &str = "application/pdf";

/// Render `markdown` to PDF, or `None` when blank or when rendering fails.
pub fn export_pdf(markdown: &str) -> Option<Vec<u8>> {
    match render_pdf(markdown) {
        Ok(bytes) => Some(bytes),
        Err(ExportError::Empty) => None,
        Err(err) => {
            tracing::warn!(error = %err, "pdf export failed");
            None
        }
    }
}

/// [`render_pdf`] on the blocking pool; layout and serialisation are CPU-bound.
pub async fn render_pdf_blocking(markdown: String) -> Result<Vec<u8>, ExportError> {
    let started = std::time::Instant::now();
    let result = tokio::task::spawn_blocking(move || render_pdf(&markdown))
        .await
        .map_err(|e| ExportError::Render(format!("render task failed: {e}")))?;
    if let Ok(bytes) = &result {
        tracing::debug!(
            bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pdf rendered"
        );
    }
    result
}
