use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or empty required field; the store was not touched.
    #[error("validation error: {0}")]
    Validation(String),
    /// Backing file could not be read, parsed or written.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn missing_field(field: &str) -> Self { Self::Validation(format!("missing required field: {field}")) }

    pub fn storage(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Storage(format!("{context}: {err}"))
    }
}
