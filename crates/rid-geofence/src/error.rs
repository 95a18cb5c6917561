use rid_core::{ErrorCode, RecordTable, RidError};
use rid_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store reached its ceiling of {max} entries")]
    CapacityExceeded { max: usize },
    #[error("store could not grow to {requested} entries")]
    OutOfMemory { requested: usize },
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            Self::OutOfMemory { .. } => ErrorCode::OutOfMemory,
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("{table}: {source}")]
    Store {
        table: RecordTable,
        #[source]
        source: StoreError,
    },
}

impl IngestionError {
    pub fn store(table: RecordTable) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { table, source }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Storage(err) => err.code(),
            Self::Store { source, .. } => source.code(),
        }
    }
}

impl From<IngestionError> for RidError {
    fn from(err: IngestionError) -> Self {
        RidError::new(err.code(), err.to_string())
    }
}
