//! Geofence evaluation: pruned polygon ingestion, containment, and the flight decision.

mod containment;
mod engine;
mod error;
mod polygon;
mod proximity;
mod store;
mod supervisor;

pub use containment::is_inside_polygon;
pub use engine::{EngineState, GeofenceEngine, IngestionReport};
pub use error::{IngestionError, StoreError};
pub use polygon::{BuildLimits, BuildSummary, CLOSING_VERTICES, PolygonBuilder, ReferenceScan};
pub use proximity::{airport_within_clearance, prison_within_clearance};
pub use store::CoordinateStore;
pub use supervisor::{IngestionProgress, NoopSupervisor, Supervisor, YieldingSupervisor};

use rid_core::Verdict;

/// Something that turns the current position into a flight verdict.
pub trait FlightPolicy {
    fn evaluate(&mut self, ingestion_ready: bool) -> Verdict;
}
