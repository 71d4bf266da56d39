use tracing::info;

use super::{Published, Workspace};
use crate::error::Result;
use crate::pdf::{PdfDocument, Rotation};
use crate::upload::Upload;

pub const DEFAULT_DEGREES: i64 = 90;

/// Rotate every page clockwise by `degrees` (90, 180 or 270)
pub fn run(workspace: &Workspace, upload: &Upload, degrees: i64) -> Result<Published> {
    upload.require_pdf()?;
    let rotation = Rotation::from_degrees(degrees)?;

    let mut doc = PdfDocument::from_upload(upload)?;
    doc.rotate(rotation)?;
    let bytes = PdfDocument::to_bytes(&mut doc.doc)?;

    info!(source = %upload.name, degrees, pages = doc.page_count(), "rotated PDF");
    workspace.publish(&format!("rotated_{}_{}", degrees, upload.name), &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{pdf_upload, workspace};
    use crate::error::Error;
    use crate::storage::OutputStore;

    #[test]
    fn test_rotate() {
        let (ws, store) = workspace();
        let published = run(&ws, &pdf_upload("scan.pdf", 2), 270).unwrap();
        assert_eq!(published.filename, "rotated_270_scan.pdf");

        let bytes = store.get("rotated_270_scan.pdf").unwrap();
        let doc = PdfDocument::from_bytes("rotated.pdf", &bytes).unwrap();
        for (_, page_id) in doc.page_ids() {
            let page = doc.doc.get_dictionary(page_id).unwrap();
            assert_eq!(page.get(b"Rotate").unwrap().as_i64().unwrap(), 270);
        }
    }

    #[test]
    fn test_rejects_bad_angle_before_parsing() {
        let (ws, store) = workspace();
        let upload = Upload::new("scan.pdf", b"not even a pdf".to_vec());

        let err = run(&ws, &upload, 45).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.to_string(), "rotation must be 90, 180 or 270 degrees");
        assert!(store.keys().is_empty());
    }
}
