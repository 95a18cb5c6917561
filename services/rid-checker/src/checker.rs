use crate::protocol::{PositionReport, VerdictLine};
use rid_core::RecordTable;
use rid_geofence::{
    EngineState, FlightPolicy, GeofenceEngine, IngestionProgress, Supervisor, YieldingSupervisor,
};
use rid_observability::{record_ingestion_failure, record_retained, record_verdict};
use rid_storage::RecordSource;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Reports "Initializing" on every check-in, then yields like [`YieldingSupervisor`].
///
/// Runs on the evaluator's blocking thread, never on the async runtime.
#[derive(Debug, Clone, Default)]
pub struct LoggingSupervisor {
    inner: YieldingSupervisor,
}

impl LoggingSupervisor {
    pub fn new(pause: Duration) -> Self {
        Self {
            inner: YieldingSupervisor::new(pause),
        }
    }
}

impl Supervisor for LoggingSupervisor {
    fn check_in(&mut self, progress: IngestionProgress) {
        tracing::info!(
            table = %progress.table,
            lines = progress.lines_scanned,
            "Initializing"
        );
        self.inner.check_in(progress);
    }
}

/// Feeds position reports through the engine and exports what changed.
pub struct Checker<S> {
    engine: GeofenceEngine<S>,
}

impl<S: RecordSource> Checker<S> {
    pub fn new(mut engine: GeofenceEngine<S>) -> Self {
        engine.init();
        Self { engine }
    }

    pub fn engine(&self) -> &GeofenceEngine<S> {
        &self.engine
    }

    pub fn handle(&mut self, report: PositionReport) -> VerdictLine {
        let before = self.engine.state();
        self.engine.update_location(report.lat, report.lon);
        let verdict = self.engine.evaluate(report.ready);
        let after = self.engine.state();

        record_verdict(&verdict);
        if before != after {
            tracing::info!(from = ?before, to = ?after, "engine state changed");
            match after {
                EngineState::Ready => self.export_retained(),
                EngineState::Failed => record_ingestion_failure(),
                _ => {}
            }
        }
        if !verdict.allowed {
            tracing::debug!(%verdict, origin = %self.engine.origin(), "flight denied");
        }

        VerdictLine::new(verdict, after)
    }

    /// Evaluates reports until the report queue closes or nobody reads verdicts anymore.
    /// Blocks the calling thread.
    pub fn run(
        mut self,
        mut reports: mpsc::Receiver<PositionReport>,
        verdicts: mpsc::Sender<VerdictLine>,
    ) {
        while let Some(report) = reports.blocking_recv() {
            let line = self.handle(report);
            if verdicts.blocking_send(line).is_err() {
                tracing::debug!("verdict receiver dropped");
                break;
            }
        }
    }

    fn export_retained(&self) {
        let report = self.engine.report();
        record_retained(RecordTable::Countries, report.country_vertices);
        record_retained(RecordTable::Airports, report.airports);
        record_retained(RecordTable::Prisons, report.prisons);
    }
}

impl<S: RecordSource + Send + 'static> Checker<S> {
    /// Moves the checker onto tokio's blocking pool; ingestion scans never stall the runtime.
    pub fn spawn(
        self,
        reports: mpsc::Receiver<PositionReport>,
        verdicts: mpsc::Sender<VerdictLine>,
    ) -> JoinHandle<()> {
        tokio::task::spawn_blocking(move || self.run(reports, verdicts))
    }
}
