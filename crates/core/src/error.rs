use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("File '{0}' not found")]
    FileNotFound(String),

    /// A poster upload would overwrite a file already in the storage directory.
    #[error("File '{0}' already exists! Please enter another file name!")]
    FileAlreadyExists(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}
