use tracing::info;

use super::{Published, Workspace};
use crate::error::Result;
use crate::pdf::PdfDocument;
use crate::upload::Upload;

pub fn run(workspace: &Workspace, upload: &Upload) -> Result<Published> {
    upload.require_pdf()?;

    let mut doc = PdfDocument::from_upload(upload)?;
    doc.compress();
    let bytes = PdfDocument::to_bytes(&mut doc.doc)?;

    info!(
        source = %upload.name,
        before = upload.bytes.len(),
        after = bytes.len(),
        "compressed PDF"
    );
    workspace.publish(&format!("compressed_{}", upload.name), &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{pdf_upload, workspace};
    use crate::error::Error;
    use crate::pdf::fixtures::page_labels;
    use crate::storage::OutputStore;

    #[test]
    fn test_compress() {
        let (ws, store) = workspace();
        let published = run(&ws, &pdf_upload("report.pdf", 2)).unwrap();

        assert_eq!(published.filename, "compressed_report.pdf");
        assert_eq!(published.download_url, "/download/compressed_report.pdf/");

        let bytes = store.get("compressed_report.pdf").unwrap();
        assert_eq!(page_labels(&bytes), vec!["Page 1", "Page 2"]);
    }

    #[test]
    fn test_rejects_non_pdf() {
        let (ws, _) = workspace();
        assert!(matches!(
            run(&ws, &pdf_upload("report.docx", 1)),
            Err(Error::Validation(_))
        ));
    }
}
