use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ProposalError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Catalog error: {0}")]
    CatalogError(String),
    #[error("Unsupported commitment length: {0} months")]
    UnsupportedCommitment(u32),
    #[error("Proposal not found: {0}")]
    NotFound(Uuid),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, ProposalError>;
