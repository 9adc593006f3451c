//! PDF page removal and archive assembly.
//!
//! This crate holds the document-level halves of the page-removal
//! service: `remove` mutates a PDF through the lopdf object model,
//! `archive` packs the results into a zip container over a pluggable
//! sink. Both are synchronous and stateless; the HTTP layer lives in
//! the `pagestrip-api` app.

pub mod archive;
pub mod error;
pub mod remove;

pub use archive::ArchiveBuilder;
pub use error::PageStripError;
pub use remove::{remove_page, PageRemoval};

/// Parse PDF bytes and return the page count
pub fn page_count(bytes: &[u8]) -> Result<u32, PageStripError> {
    let doc =
        lopdf::Document::load_mem(bytes).map_err(|e| PageStripError::Parse(e.to_string()))?;
    Ok(doc.get_pages().len() as u32)
}
