use thiserror::Error;

pub type Result<T> = std::result::Result<T, SopTreeError>;

#[derive(Debug, Error)]
pub enum SopTreeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Document error: {0}")]
    Document(String),
    #[error("Unknown command: {0}")]
    Command(String),
    #[error("Script error on line {line}: {message}")]
    Script { line: usize, message: String },
    #[error("Error: {0}")]
    Generic(String),
}

impl From<String> for SopTreeError {
    fn from(error: String) -> Self {
        SopTreeError::Generic(error)
    }
}

impl From<&str> for SopTreeError {
    fn from(error: &str) -> Self {
        SopTreeError::Generic(error.to_string())
    }
}
