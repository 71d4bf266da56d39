use serde::Serialize;

use crate::error::Result;
use crate::page_range::{self, IgnoredToken};
use crate::pdf::PdfDocument;
use crate::upload::Upload;

/// Preview of which pages a range specification picks from a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagesResult {
    pub total_pages: u32,
    pub selected_pages: Vec<u32>,
    /// Every page was selected because nothing in the range was usable
    pub fell_back: bool,
    pub ignored_tokens: Vec<IgnoredToken>,
}

pub fn run(upload: &Upload, range: &str) -> Result<PagesResult> {
    let doc = PdfDocument::from_upload(upload)?;
    let total_pages = doc.page_count();
    let selection = page_range::select(range, total_pages);

    Ok(PagesResult {
        total_pages,
        selected_pages: page_range::to_page_numbers(&selection.indices),
        fell_back: selection.fell_back,
        ignored_tokens: selection.ignored,
    })
}
