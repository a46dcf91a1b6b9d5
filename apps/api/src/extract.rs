//! Text Extractor — PDF bytes in, plain text out.
//!
//! Only the first [`MAX_PAGES`] pages are read; anything beyond is silently
//! ignored. Extraction is CPU-bound, so it runs inside
//! `tokio::task::spawn_blocking` to keep the async executor free. Page order
//! is preserved in the joined output regardless of how the underlying library
//! schedules its work.

use bytes::Bytes;
use thiserror::Error;

/// Pages past this bound are not extracted.
pub const MAX_PAGES: usize = 10;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read document: {0}")]
    Unreadable(String),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Extracts plain text from a PDF, bounded to the first [`MAX_PAGES`] pages.
///
/// A document that parses but carries no text yields an empty or
/// whitespace-only string; the caller is responsible for rejecting that as a
/// validation failure.
pub async fn extract_text(document: Bytes) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || {
        let pages = pdf_extract::extract_text_from_mem_by_pages(&document)
            .map_err(|e| ExtractError::Unreadable(e.to_string()))?;
        Ok(join_pages(pages))
    })
    .await
    .map_err(|e| ExtractError::Task(e.to_string()))?
}

/// Joins page texts with a single space, in page order, keeping at most the
/// first [`MAX_PAGES`] entries.
fn join_pages(pages: Vec<String>) -> String {
    pages
        .iter()
        .take(MAX_PAGES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
