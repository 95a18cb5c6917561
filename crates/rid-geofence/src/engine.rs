use crate::FlightPolicy;
use crate::containment::is_inside_polygon;
use crate::error::IngestionError;
use crate::polygon::{BuildLimits, BuildSummary, PolygonBuilder, ReferenceScan};
use crate::proximity::{airport_within_clearance, prison_within_clearance};
use crate::store::CoordinateStore;
use crate::supervisor::{IngestionProgress, NoopSupervisor, Supervisor, YieldTimer};
use rid_config::GeofenceConfig;
use rid_core::{AirportRecord, DenialReason, RecordTable, RidError, Verdict};
use rid_geo::Coordinate;
use rid_storage::{RecordSource, parse_airport, parse_border, parse_coordinate};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Uninitialized,
    AwaitingGps,
    AwaitingIngestion,
    Ready,
    /// Ingestion failed; every evaluation reports a file error until the next `init`.
    Failed,
}

/// Counts from the last successful ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestionReport {
    pub reference_polygon: usize,
    pub polygons_seen: usize,
    pub polygons_retained: usize,
    pub polygons_closed: usize,
    pub parity_flips: usize,
    pub parity_unresolved: usize,
    pub country_vertices: usize,
    pub airports: usize,
    pub prisons: usize,
}

impl IngestionReport {
    fn with_polygons(mut self, summary: BuildSummary) -> Self {
        self.polygons_seen = summary.polygons_seen;
        self.polygons_retained = summary.polygons_retained;
        self.polygons_closed = summary.polygons_closed;
        self.parity_flips = summary.parity_flips;
        self.parity_unresolved = summary.parity_unresolved;
        self
    }
}

/// Decides whether flight is allowed at the current position.
///
/// The engine owns one buffer per record table. Tables are read once, on the first evaluation
/// after a GPS fix where the caller reports ingestion as ready, and only records within reach
/// of the position at that moment are kept.
pub struct GeofenceEngine<S> {
    config: GeofenceConfig,
    source: S,
    supervisor: Box<dyn Supervisor + Send>,
    origin: Coordinate,
    initialized: bool,
    storage_available: bool,
    files_loaded: bool,
    ingestion_failed: bool,
    reference_polygon: usize,
    countries: CoordinateStore<Coordinate>,
    airports: CoordinateStore<AirportRecord>,
    prisons: CoordinateStore<Coordinate>,
    report: IngestionReport,
    last_error: Option<RidError>,
}

impl<S: RecordSource> GeofenceEngine<S> {
    pub fn new(config: GeofenceConfig, source: S) -> Self {
        let (initial, max) = (config.store_initial_capacity, config.store_max_capacity);
        Self {
            config,
            source,
            supervisor: Box::new(NoopSupervisor),
            origin: Coordinate::ZERO,
            initialized: false,
            storage_available: false,
            files_loaded: false,
            ingestion_failed: false,
            reference_polygon: 0,
            countries: CoordinateStore::new(initial, max),
            airports: CoordinateStore::new(initial, max),
            prisons: CoordinateStore::new(initial, max),
            report: IngestionReport::default(),
            last_error: None,
        }
    }

    pub fn with_supervisor(mut self, supervisor: impl Supervisor + Send + 'static) -> Self {
        self.supervisor = Box::new(supervisor);
        self
    }

    /// Clears every buffer and flag and checks the record source. The position is kept.
    pub fn init(&mut self) {
        self.countries.reset();
        self.airports.reset();
        self.prisons.reset();
        self.files_loaded = false;
        self.ingestion_failed = false;
        self.reference_polygon = 0;
        self.report = IngestionReport::default();
        self.last_error = None;

        self.storage_available = self.source.is_available();
        if !self.storage_available {
            warn!("record storage unavailable");
        }
        self.initialized = true;
        debug!(bypass = ?self.config.bypass, "geofence engine initialized");
    }

    pub fn update_location(&mut self, latitude: f64, longitude: f64) {
        self.origin = Coordinate::new(latitude, longitude);
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn state(&self) -> EngineState {
        if !self.initialized {
            EngineState::Uninitialized
        } else if self.ingestion_failed {
            EngineState::Failed
        } else if self.origin.is_zero() {
            EngineState::AwaitingGps
        } else if !self.files_loaded {
            EngineState::AwaitingIngestion
        } else {
            EngineState::Ready
        }
    }

    pub fn files_loaded(&self) -> bool {
        self.files_loaded
    }

    /// 1-based index of the country polygon containing the ingestion origin, 0 for none.
    pub fn reference_polygon(&self) -> usize {
        self.reference_polygon
    }

    pub fn country_vertices(&self) -> &[Coordinate] {
        self.countries.as_slice()
    }

    pub fn airports(&self) -> &[AirportRecord] {
        self.airports.as_slice()
    }

    pub fn prisons(&self) -> &[Coordinate] {
        self.prisons.as_slice()
    }

    pub fn report(&self) -> IngestionReport {
        self.report
    }

    pub fn last_error(&self) -> Option<&RidError> {
        self.last_error.as_ref()
    }

    /// Reads every enabled table. Each table is all or nothing; the caller decides what a
    /// failure means for the others.
    pub fn ingest(&mut self) -> Result<IngestionReport, IngestionError> {
        let mut report = IngestionReport::default();
        if self.config.airport_enabled() {
            report.airports = self.ingest_airports()?;
        }
        if self.config.country_enabled() {
            let summary = self.ingest_countries()?;
            report = report.with_polygons(summary);
            report.reference_polygon = self.reference_polygon;
            report.country_vertices = self.countries.len();
        }
        if self.config.prison_enabled() {
            report.prisons = self.ingest_prisons()?;
        }
        Ok(report)
    }

    fn yield_interval(&self) -> Duration {
        Duration::from_millis(self.config.yield_interval_ms)
    }

    fn ingest_airports(&mut self) -> Result<usize, IngestionError> {
        let table = RecordTable::Airports;
        info!(table = %table, "ingesting table");
        let mut timer = YieldTimer::new(self.yield_interval());
        self.airports.reset();

        for (index, line) in self.source.open(table)?.enumerate() {
            let line = line?;
            timer.tick(&mut *self.supervisor, progress(table, index));
            if line.trim().is_empty() {
                continue;
            }
            let airport = parse_airport(&line);
            if self.origin.distance_km(airport.position) < self.config.max_drone_distance_km {
                self.airports
                    .push(airport)
                    .map_err(IngestionError::store(table))?;
            }
        }

        info!(table = %table, retained = self.airports.len(), "table ingested");
        Ok(self.airports.len())
    }

    fn ingest_countries(&mut self) -> Result<BuildSummary, IngestionError> {
        let table = RecordTable::Countries;
        info!(table = %table, "ingesting table");
        let origin = self.origin;
        let mut timer = YieldTimer::new(self.yield_interval());
        self.countries.reset();

        let mut scan = ReferenceScan::new(origin);
        for (index, line) in self.source.open(table)?.enumerate() {
            let line = line?;
            timer.tick(&mut *self.supervisor, progress(table, index));
            if let Some(record) = parse_border(&line) {
                scan.push(record);
            }
            if scan.found().is_some() {
                break;
            }
        }
        self.reference_polygon = scan.finish();
        debug!(reference_polygon = self.reference_polygon, "reference pass finished");

        let limits = BuildLimits {
            max_distance_km: self.config.max_drone_distance_km,
            closing_line_km: self.config.closing_line_km,
        };
        let mut builder =
            PolygonBuilder::new(&mut self.countries, origin, limits, self.reference_polygon);
        for (index, line) in self.source.open(table)?.enumerate() {
            let line = line?;
            timer.tick(&mut *self.supervisor, progress(table, index));
            if let Some(record) = parse_border(&line) {
                builder.push(record).map_err(IngestionError::store(table))?;
            }
        }
        let summary = builder.finish().map_err(IngestionError::store(table))?;

        info!(
            table = %table,
            retained = self.countries.len(),
            polygons = summary.polygons_seen,
            closed = summary.polygons_closed,
            reference_polygon = self.reference_polygon,
            "table ingested"
        );
        Ok(summary)
    }

    fn ingest_prisons(&mut self) -> Result<usize, IngestionError> {
        let table = RecordTable::Prisons;
        info!(table = %table, "ingesting table");
        let mut timer = YieldTimer::new(self.yield_interval());
        self.prisons.reset();

        for (index, line) in self.source.open(table)?.enumerate() {
            let line = line?;
            timer.tick(&mut *self.supervisor, progress(table, index));
            if line.trim().is_empty() {
                continue;
            }
            let prison = parse_coordinate(&line);
            if self.origin.distance_km(prison) < self.config.max_drone_distance_km {
                self.prisons
                    .push(prison)
                    .map_err(IngestionError::store(table))?;
            }
        }

        info!(table = %table, retained = self.prisons.len(), "table ingested");
        Ok(self.prisons.len())
    }

    pub fn is_near_airport(&self) -> bool {
        airport_within_clearance(self.origin, self.airports.as_slice(), &self.config.clearances)
            .is_some()
    }

    pub fn is_near_prison(&self) -> bool {
        prison_within_clearance(
            self.origin,
            self.prisons.as_slice(),
            self.config.clearances.prison_km,
        )
        .is_some()
    }

    /// Live containment over the retained polygons, or the reference pass result when nothing
    /// was close enough to retain.
    pub fn is_inside_banned_country(&self) -> bool {
        if self.countries.is_empty() {
            self.reference_polygon > 0
        } else {
            is_inside_polygon(self.countries.as_slice(), self.origin, 0)
        }
    }

    /// Runs one evaluation. `ingestion_ready` gates the one-time table ingestion.
    pub fn is_flying_allowed(&mut self, ingestion_ready: bool) -> Verdict {
        if !self.initialized {
            self.init();
        }
        if self.config.everything_bypassed() {
            return Verdict::allowed();
        }
        if !self.storage_available {
            return Verdict::denied(DenialReason::FileError, "filesystem unavailable");
        }
        if self.origin.is_zero() {
            return Verdict::denied(DenialReason::Gps, "no position");
        }
        if self.ingestion_failed {
            return Verdict::denied(DenialReason::FileError, "file error");
        }
        if !self.files_loaded && ingestion_ready {
            match self.ingest() {
                Ok(report) => {
                    self.report = report;
                    self.files_loaded = true;
                }
                Err(err) => {
                    self.fail_ingestion(err);
                    return Verdict::denied(DenialReason::FileError, "file error");
                }
            }
        }

        if self.config.airport_enabled() && !self.airports.is_empty() && self.is_near_airport() {
            return Verdict::denied(DenialReason::Airport, "near airport");
        }
        if self.config.prison_enabled() && self.is_near_prison() {
            return Verdict::denied(DenialReason::Prison, "near prison");
        }
        if self.config.country_enabled() && self.is_inside_banned_country() {
            return Verdict::denied(DenialReason::Country, "inside banned country");
        }
        Verdict::allowed()
    }

    fn fail_ingestion(&mut self, err: IngestionError) {
        warn!(error = %err, "ingestion failed");
        self.countries.release();
        self.airports.release();
        self.prisons.release();
        self.reference_polygon = 0;
        self.ingestion_failed = true;
        self.last_error = Some(err.into());
    }
}

impl<S: RecordSource> FlightPolicy for GeofenceEngine<S> {
    fn evaluate(&mut self, ingestion_ready: bool) -> Verdict {
        self.is_flying_allowed(ingestion_ready)
    }
}

fn progress(table: RecordTable, index: usize) -> IngestionProgress {
    IngestionProgress {
        table,
        lines_scanned: index + 1,
    }
}
