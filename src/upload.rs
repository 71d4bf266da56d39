use std::path::Path;

use crate::error::{Error, Result};

/// An input file handed to one of the workflow operations
#[derive(Debug, Clone)]
pub struct Upload {
    /// Base file name as the client supplied it
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Upload {
            name: name.into(),
            bytes,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::validation(format!("Not a file: {}", path.display())))?;
        let bytes = std::fs::read(path)?;
        Ok(Upload::new(name, bytes))
    }

    pub fn is_pdf(&self) -> bool {
        self.name.ends_with(".pdf")
    }

    pub fn require_pdf(&self) -> Result<()> {
        if !self.is_pdf() {
            return Err(Error::validation("a valid PDF file is required"));
        }
        Ok(())
    }
}
