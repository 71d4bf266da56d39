use tracing::info;

use super::{Published, Workspace};
use crate::error::{Error, Result};
use crate::pdf::{document, PdfDocument};
use crate::upload::Upload;

pub const OUTPUT_NAME: &str = "merged_document.pdf";

/// Combine the pages of two or more PDFs, in upload order, into one file
pub fn run(workspace: &Workspace, uploads: &[Upload]) -> Result<Published> {
    if uploads.len() < 2 {
        return Err(Error::validation("at least 2 PDF files are required"));
    }
    if uploads.iter().any(|u| !u.is_pdf()) {
        return Err(Error::validation("only PDF files are allowed"));
    }

    let documents = uploads
        .iter()
        .map(PdfDocument::from_upload)
        .collect::<Result<Vec<_>>>()?;

    let mut merged = document::merge(documents)?;
    let pages = merged.get_pages().len();
    let bytes = PdfDocument::to_bytes(&mut merged)?;

    info!(files = uploads.len(), pages, "merged PDFs");
    workspace.publish(OUTPUT_NAME, &bytes)
}
