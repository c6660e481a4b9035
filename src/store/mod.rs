use thiserror::Error;

use crate::persistence::storage::StorageError;

use self::schema::SchemaValidationError;

pub mod options;
pub mod request_manager;
pub mod schema;
pub mod store;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Stored employees failed validation: {0}")]
    SchemaValidation(#[from] SchemaValidationError),

    /// GET found nothing usable, or a PUT / POST transform returned no collection
    #[error("{0}")]
    EmptyResult(String),

    #[error("Stored employees are not valid JSON: {0}")]
    Deserialization(serde_json::Error),

    #[error("Unable to serialize employees: {0}")]
    Serialization(serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Unable to start employee store: {0}")]
    Startup(std::io::Error),

    #[error("Employee store took too long to respond to request")]
    Timeout,

    /// The caller stopped waiting before the request was applied
    #[error("Request was abandoned before it was applied")]
    Cancelled,

    #[error("Employee store is not running")]
    Stopped,

    #[error("An unknown error occurred: {0}")]
    Unknown(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
