use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageStripError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("Page numbers are 1-based; 0 is not a valid target")]
    InvalidPage,

    #[error("Failed to serialize PDF: {0}")]
    Save(String),

    #[error("Archive write failed: {0}")]
    Archive(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for PageStripError {
    fn from(err: zip::result::ZipError) -> Self {
        PageStripError::Archive(err.to_string())
    }
}
