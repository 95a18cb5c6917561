pub mod domain;
pub mod error;

pub use domain::{
    AirportCategory, AirportRecord, DenialReason, REASON_MAX_LEN, RecordTable, Verdict,
};
pub use error::{ErrorCode, RidError};
pub use rid_geo::Coordinate;
