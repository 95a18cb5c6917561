use rid_core::AirportCategory;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub log_level: String,
    pub data_dir: String,
    pub metrics_addr: Option<String>,
}

impl ServiceConfig {
    pub fn from_env(default_service_name: &str) -> Self {
        Self {
            service_name: env_var("RID_SERVICE_NAME", default_service_name.to_string()),
            log_level: env_var("RID_LOG_LEVEL", "info".to_string()),
            data_dir: env_var("RID_DATA_DIR", "/var/lib/rid".to_string()),
            metrics_addr: env::var("RID_METRICS_ADDR").ok(),
        }
    }
}

/// Per-category switches. A bypassed category is neither ingested nor checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BypassFlags {
    pub airport: bool,
    pub country: bool,
    pub prison: bool,
}

impl BypassFlags {
    pub fn from_env() -> Self {
        Self {
            airport: env_var_bool("RID_BYPASS_AIRPORT", false),
            country: env_var_bool("RID_BYPASS_COUNTRY", false),
            prison: env_var_bool("RID_BYPASS_PRISON", false),
        }
    }

    pub fn all() -> Self {
        Self {
            airport: true,
            country: true,
            prison: true,
        }
    }
}

/// Minimum clearance distances in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearanceTable {
    pub large_airport_km: f64,
    pub medium_airport_km: f64,
    pub small_airport_km: f64,
    pub heliport_km: f64,
    pub seaplane_base_km: f64,
    pub balloon_base_km: f64,
    pub test_field_km: f64,
    pub prison_km: f64,
    /// Replaces every airport clearance when set to a non-zero value.
    pub airport_override_km: Option<f64>,
}

impl Default for ClearanceTable {
    fn default() -> Self {
        Self {
            large_airport_km: 8.0,
            medium_airport_km: 5.0,
            small_airport_km: 3.0,
            heliport_km: 1.0,
            seaplane_base_km: 2.0,
            balloon_base_km: 1.0,
            test_field_km: 0.5,
            prison_km: 1.0,
            airport_override_km: None,
        }
    }
}

impl ClearanceTable {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            large_airport_km: env_var_f64("RID_MIN_LARGE_AIRPORT_KM", defaults.large_airport_km),
            medium_airport_km: env_var_f64("RID_MIN_MEDIUM_AIRPORT_KM", defaults.medium_airport_km),
            small_airport_km: env_var_f64("RID_MIN_SMALL_AIRPORT_KM", defaults.small_airport_km),
            heliport_km: env_var_f64("RID_MIN_HELIPORT_KM", defaults.heliport_km),
            seaplane_base_km: env_var_f64("RID_MIN_SEAPLANE_BASE_KM", defaults.seaplane_base_km),
            balloon_base_km: env_var_f64("RID_MIN_BALLOON_BASE_KM", defaults.balloon_base_km),
            test_field_km: env_var_f64("RID_MIN_TEST_FIELD_KM", defaults.test_field_km),
            prison_km: env_var_f64("RID_MIN_PRISON_KM", defaults.prison_km),
            airport_override_km: env::var("RID_AIRPORT_OVERRIDE_KM")
                .ok()
                .and_then(|value| value.trim().parse::<f64>().ok()),
        }
    }

    pub fn for_airport(&self, category: AirportCategory) -> f64 {
        if let Some(km) = self.airport_override_km.filter(|km| *km != 0.0) {
            return km;
        }
        match category {
            AirportCategory::LargeAirport => self.large_airport_km,
            AirportCategory::MediumAirport => self.medium_airport_km,
            AirportCategory::SmallAirport => self.small_airport_km,
            AirportCategory::Heliport => self.heliport_km,
            AirportCategory::SeaplaneBase => self.seaplane_base_km,
            AirportCategory::BalloonBase => self.balloon_base_km,
            AirportCategory::TestField => self.test_field_km,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeofenceConfig {
    pub bypass: BypassFlags,
    /// Whether this deployment ships a prison table at all.
    pub prison_support: bool,
    pub clearances: ClearanceTable,
    /// Records and border edges farther than this from the vehicle are pruned at load time.
    pub max_drone_distance_km: f64,
    /// How far synthetic closing vertices are projected from the vehicle.
    pub closing_line_km: f64,
    pub store_initial_capacity: usize,
    pub store_max_capacity: usize,
    pub yield_interval_ms: u64,
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            bypass: BypassFlags::default(),
            prison_support: true,
            clearances: ClearanceTable::default(),
            max_drone_distance_km: 55.0,
            closing_line_km: 200.0,
            store_initial_capacity: 16,
            store_max_capacity: 1024,
            yield_interval_ms: 500,
        }
    }
}

impl GeofenceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bypass: BypassFlags::from_env(),
            prison_support: env_var_bool("RID_PRISON_SUPPORT", defaults.prison_support),
            clearances: ClearanceTable::from_env(),
            max_drone_distance_km: env_var_f64(
                "RID_MAX_DRONE_DISTANCE_KM",
                defaults.max_drone_distance_km,
            ),
            closing_line_km: env_var_f64("RID_CLOSING_LINE_KM", defaults.closing_line_km),
            store_initial_capacity: env_var_usize(
                "RID_STORE_INITIAL_CAPACITY",
                defaults.store_initial_capacity,
            ),
            store_max_capacity: env_var_usize(
                "RID_STORE_MAX_CAPACITY",
                defaults.store_max_capacity,
            ),
            yield_interval_ms: env_var_u64("RID_YIELD_INTERVAL_MS", defaults.yield_interval_ms),
        }
    }

    pub fn airport_enabled(&self) -> bool {
        !self.bypass.airport
    }

    pub fn country_enabled(&self) -> bool {
        !self.bypass.country
    }

    pub fn prison_enabled(&self) -> bool {
        self.prison_support && !self.bypass.prison
    }

    /// True when no category is left to check.
    pub fn everything_bypassed(&self) -> bool {
        !self.airport_enabled() && !self.country_enabled() && !self.prison_enabled()
    }
}

fn env_var(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn env_var_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<f64>().ok())
        .unwrap_or(default)
}

fn env_var_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_var_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|value| parse_bool(&value, default))
        .unwrap_or(default)
}

fn parse_bool(value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_values() {
        assert!(parse_bool("YES", false));
        assert!(parse_bool(" on ", false));
        assert!(!parse_bool("0", true));
        assert!(parse_bool("maybe", true));
        assert!(!parse_bool("maybe", false));
    }

    #[test]
    fn clearance_per_category() {
        let table = ClearanceTable::default();
        assert_eq!(table.for_airport(AirportCategory::LargeAirport), 8.0);
        assert_eq!(table.for_airport(AirportCategory::Heliport), 1.0);
        assert_eq!(table.for_airport(AirportCategory::TestField), 0.5);
    }

    #[test]
    fn override_replaces_every_category() {
        let table = ClearanceTable {
            airport_override_km: Some(20.0),
            ..ClearanceTable::default()
        };
        for category in AirportCategory::ALL {
            assert_eq!(table.for_airport(category), 20.0);
        }

        let disabled = ClearanceTable {
            airport_override_km: Some(0.0),
            ..ClearanceTable::default()
        };
        assert_eq!(disabled.for_airport(AirportCategory::MediumAirport), 5.0);
    }

    #[test]
    fn disabled_prison_support_counts_as_bypassed() {
        let config = GeofenceConfig {
            bypass: BypassFlags {
                airport: true,
                country: true,
                prison: false,
            },
            prison_support: false,
            ..GeofenceConfig::default()
        };
        assert!(!config.prison_enabled());
        assert!(config.everything_bypassed());

        let config = GeofenceConfig {
            prison_support: true,
            ..config
        };
        assert!(!config.everything_bypassed());
    }
}
