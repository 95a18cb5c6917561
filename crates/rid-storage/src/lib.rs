use rid_core::{ErrorCode, RecordTable, RidError};
use std::io;
use thiserror::Error;

mod records;
mod source;

pub use records::{BorderRecord, parse_airport, parse_border, parse_coordinate};
pub use source::{DirectoryRecordSource, MemoryRecordSource, RecordReader, RecordSource};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("record store is not mounted")]
    Unavailable,
    #[error("table {0} not found")]
    MissingTable(RecordTable),
    #[error("table {0} is empty")]
    EmptyTable(RecordTable),
    #[error("failed reading table {table}: {source}")]
    Io {
        table: RecordTable,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::StorageUnavailable
    }
}

impl From<StorageError> for RidError {
    fn from(err: StorageError) -> Self {
        RidError::new(err.code(), err.to_string())
    }
}
