use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to parse source document: {0}")]
    Unreadable(String),

    #[error("Source document has no pages")]
    NoPages,

    #[error("Failed to decode source image: {0}")]
    Image(String),

    #[error("Failed to serialize output: {0}")]
    Serialize(String),
}
