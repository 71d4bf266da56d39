use serde::Serialize;
use tracing::{debug, info};

use super::Workspace;
use crate::error::{Error, Result};
use crate::page_range::{self, IgnoredToken};
use crate::pdf::PdfDocument;
use crate::upload::Upload;

#[derive(Debug, Clone, Default)]
pub struct SplitOptions {
    /// Page range specification, e.g. "1-3,5,7-9". Empty selects every page.
    pub range: String,
    /// Write the selection as one combined file instead of one file per page
    pub merge_pages: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFile {
    pub filename: String,
    pub download_url: String,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SplitResult {
    Combined {
        success: bool,
        download_url: String,
        filename: String,
        total_pages: u32,
        selected_pages: Vec<u32>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        ignored_tokens: Vec<IgnoredToken>,
    },
    PerPage {
        success: bool,
        files: Vec<PageFile>,
        total_pages: u32,
        selected_pages: Vec<u32>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        ignored_tokens: Vec<IgnoredToken>,
    },
}

/// Extract the pages selected by `options.range`, either into a single file
/// or into one file per page.
pub fn run(workspace: &Workspace, upload: &Upload, options: &SplitOptions) -> Result<SplitResult> {
    upload.require_pdf()?;

    let doc = PdfDocument::from_upload(upload)?;
    let total_pages = doc.page_count();
    if total_pages == 0 {
        return Err(Error::EmptyPdf(upload.name.clone()));
    }

    let range = options.range.trim();
    let selection = page_range::select(range, total_pages);
    for ignored in &selection.ignored {
        debug!(token = %ignored.token, reason = ?ignored.reason, "ignoring page range token");
    }
    let selected_pages = page_range::to_page_numbers(&selection.indices);

    info!(
        source = %upload.name,
        total_pages,
        selected = selected_pages.len(),
        merge_pages = options.merge_pages,
        "splitting PDF"
    );

    if options.merge_pages {
        let filename = if range.is_empty() {
            "extracted_all_pages.pdf"
        } else {
            "extracted_pages.pdf"
        };

        let mut extracted = doc.select_pages(&selection.indices)?;
        let published = workspace.publish(filename, &PdfDocument::to_bytes(&mut extracted)?)?;

        return Ok(SplitResult::Combined {
            success: true,
            download_url: published.download_url,
            filename: published.filename,
            total_pages,
            selected_pages,
            ignored_tokens: selection.ignored,
        });
    }

    let mut files = Vec::with_capacity(selection.indices.len());
    for &index in &selection.indices {
        let page = index + 1;
        let filename = format!("page_{}.pdf", page);

        let mut single = doc.select_pages(&[index])?;
        let published = workspace.publish(&filename, &PdfDocument::to_bytes(&mut single)?)?;

        files.push(PageFile {
            filename: published.filename,
            download_url: published.download_url,
            page,
        });
    }

    Ok(SplitResult::PerPage {
        success: true,
        files,
        total_pages,
        selected_pages,
        ignored_tokens: selection.ignored,
    })
}
