use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A coordinate buffer could not grow.
    OutOfMemory,
    /// A coordinate buffer reached its configured ceiling.
    CapacityExceeded,
    /// The backing record store is not mounted or a table cannot be read.
    StorageUnavailable,
    /// No position fix has been reported yet.
    NoFix,
    MalformedRecord,
}

#[derive(Debug, Clone)]
pub struct RidError {
    pub code: ErrorCode,
    pub message: String,
}

impl RidError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for RidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for RidError {}
