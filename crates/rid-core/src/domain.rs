use rid_geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest reason text a verdict carries, in bytes.
pub const REASON_MAX_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirportCategory {
    LargeAirport,
    MediumAirport,
    SmallAirport,
    Heliport,
    SeaplaneBase,
    BalloonBase,
    TestField,
}

impl AirportCategory {
    pub const ALL: [AirportCategory; 7] = [
        Self::LargeAirport,
        Self::MediumAirport,
        Self::SmallAirport,
        Self::Heliport,
        Self::SeaplaneBase,
        Self::BalloonBase,
        Self::TestField,
    ];

    /// Looks up the category by its index in the airport table.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }
}

impl Default for AirportCategory {
    fn default() -> Self {
        Self::LargeAirport
    }
}

impl FromStr for AirportCategory {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let index: u8 = value.trim().parse().map_err(|_| ())?;
        Self::from_index(index).ok_or(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    pub category: AirportCategory,
    pub position: Coordinate,
}

impl AirportRecord {
    pub fn new(category: AirportCategory, latitude: f64, longitude: f64) -> Self {
        Self {
            category,
            position: Coordinate::new(latitude, longitude),
        }
    }
}

/// The record tables the geofence consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordTable {
    Countries,
    Airports,
    Prisons,
}

impl RecordTable {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Countries => "banned_countries.txt",
            Self::Airports => "world_airport_list.txt",
            Self::Prisons => "world_prison_list.txt",
        }
    }
}

impl fmt::Display for RecordTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Countries => "countries",
            Self::Airports => "airports",
            Self::Prisons => "prisons",
        };
        write!(f, "{}", value)
    }
}

/// Why flight is denied. Discriminants are the values reported to the flight controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    NoBan = 0,
    Airport = 1,
    Country = 2,
    Prison = 3,
    FileError = 4,
    Gps = 5,
}

impl DenialReason {
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::NoBan => "",
            Self::Airport => "AIRPORT",
            Self::Country => "COUNTRY",
            Self::Prison => "PRISON",
            Self::FileError => "FILE",
            Self::Gps => "GPS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub allowed: bool,
    pub reason: DenialReason,
    pub detail: String,
}

impl Verdict {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: DenialReason::NoBan,
            detail: String::new(),
        }
    }

    /// Builds a denial; `detail` is cut to [`REASON_MAX_LEN`] bytes on a char boundary.
    pub fn denied(reason: DenialReason, detail: impl Into<String>) -> Self {
        let mut detail = detail.into();
        if detail.len() > REASON_MAX_LEN {
            let mut end = REASON_MAX_LEN;
            while !detail.is_char_boundary(end) {
                end -= 1;
            }
            detail.truncate(end);
        }
        Self {
            allowed: false,
            reason,
            detail,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.allowed {
            write!(f, "allowed")
        } else {
            write!(f, "denied [{}] {}", self.reason.tag(), self.detail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_indices_follow_table_order() {
        assert_eq!(AirportCategory::from_index(0), Some(AirportCategory::LargeAirport));
        assert_eq!(AirportCategory::from_index(3), Some(AirportCategory::Heliport));
        assert_eq!(AirportCategory::from_index(6), Some(AirportCategory::TestField));
        assert_eq!(AirportCategory::from_index(7), None);
        assert_eq!("5".parse::<AirportCategory>(), Ok(AirportCategory::BalloonBase));
        assert!("x".parse::<AirportCategory>().is_err());
        for category in AirportCategory::ALL {
            assert_eq!(AirportCategory::from_index(category.index()), Some(category));
        }
    }

    #[test]
    fn reason_codes() {
        assert_eq!(DenialReason::NoBan.code(), 0);
        assert_eq!(DenialReason::Airport.code(), 1);
        assert_eq!(DenialReason::Country.code(), 2);
        assert_eq!(DenialReason::Prison.code(), 3);
        assert_eq!(DenialReason::FileError.code(), 4);
        assert_eq!(DenialReason::Gps.code(), 5);
    }

    #[test]
    fn denial_detail_is_capped() {
        let verdict = Verdict::denied(DenialReason::Airport, "a".repeat(80));
        assert!(!verdict.allowed);
        assert_eq!(verdict.detail.len(), REASON_MAX_LEN);

        // multi-byte chars are never split
        let verdict = Verdict::denied(DenialReason::Country, "é".repeat(40));
        assert!(verdict.detail.len() <= REASON_MAX_LEN);
        assert!(verdict.detail.chars().all(|c| c == 'é'));
    }

    #[test]
    fn allowed_has_no_reason() {
        let verdict = Verdict::allowed();
        assert!(verdict.allowed);
        assert_eq!(verdict.reason, DenialReason::NoBan);
        assert_eq!(verdict.to_string(), "allowed");
    }
}
