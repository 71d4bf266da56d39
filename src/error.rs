//! Error types shared by the document workflow operations

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The request itself is unacceptable (wrong file type, bad angle, ...)
    #[error("{0}")]
    Validation(String),

    /// A stored output with this name does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// The document parsed but has no pages
    #[error("PDF has no pages: {0}")]
    EmptyPdf(String),

    /// An input could not be parsed as a PDF
    #[error("Failed to open PDF {name}: {source}")]
    Unreadable {
        name: String,
        #[source]
        source: lopdf::Error,
    },

    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// HTTP-style status code describing who is at fault.
    pub fn status(&self) -> u16 {
        match self {
            Error::Validation(_) | Error::EmptyPdf(_) | Error::Unreadable { .. } => 400,
            Error::NotFound(_) => 404,
            Error::Pdf(_) | Error::Io(_) => 500,
        }
    }
}
