use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldError {
    #[error("Invalid field geometry: {0}")]
    Validation(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Unsupported document type: {0}")]
    UnsupportedMime(String),
}
