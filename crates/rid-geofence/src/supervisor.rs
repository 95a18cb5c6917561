use rid_core::RecordTable;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Where a long ingestion scan currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestionProgress {
    pub table: RecordTable,
    pub lines_scanned: usize,
}

/// Receives control periodically while record tables are scanned, so a watchdog or scheduler
/// sharing the thread is not starved.
pub trait Supervisor {
    fn check_in(&mut self, progress: IngestionProgress);
}

#[derive(Debug, Default)]
pub struct NoopSupervisor;

impl Supervisor for NoopSupervisor {
    fn check_in(&mut self, _progress: IngestionProgress) {}
}

/// Hands the thread back to the OS scheduler on every check-in.
#[derive(Debug, Clone, Default)]
pub struct YieldingSupervisor {
    pause: Duration,
}

impl YieldingSupervisor {
    pub fn new(pause: Duration) -> Self {
        Self { pause }
    }
}

impl Supervisor for YieldingSupervisor {
    fn check_in(&mut self, progress: IngestionProgress) {
        tracing::trace!(table = %progress.table, lines = progress.lines_scanned, "ingestion yield");
        if self.pause.is_zero() {
            std::thread::yield_now();
        } else {
            std::thread::sleep(self.pause);
        }
    }
}

/// Decides when a scan owes its supervisor a check-in.
#[derive(Debug)]
pub(crate) struct YieldTimer {
    interval: Duration,
    last: Instant,
}

impl YieldTimer {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Instant::now(),
        }
    }

    pub(crate) fn tick<S>(&mut self, supervisor: &mut S, progress: IngestionProgress)
    where
        S: Supervisor + ?Sized,
    {
        if self.last.elapsed() >= self.interval {
            supervisor.check_in(progress);
            self.last = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<IngestionProgress>);

    impl Supervisor for Recorder {
        fn check_in(&mut self, progress: IngestionProgress) {
            self.0.push(progress);
        }
    }

    fn progress(lines_scanned: usize) -> IngestionProgress {
        IngestionProgress {
            table: RecordTable::Countries,
            lines_scanned,
        }
    }

    #[test]
    fn zero_interval_checks_in_every_tick() {
        let mut recorder = Recorder::default();
        let mut timer = YieldTimer::new(Duration::ZERO);
        for line in 1..=3 {
            timer.tick(&mut recorder, progress(line));
        }
        assert_eq!(recorder.0, vec![progress(1), progress(2), progress(3)]);
    }

    #[test]
    fn long_interval_stays_quiet() {
        let mut recorder = Recorder::default();
        let mut timer = YieldTimer::new(Duration::from_secs(3600));
        for line in 1..=100 {
            timer.tick(&mut recorder, progress(line));
        }
        assert!(recorder.0.is_empty());
    }

    #[test]
    fn yielding_supervisor_returns() {
        let mut supervisor = YieldingSupervisor::new(Duration::from_millis(1));
        supervisor.check_in(progress(1));
        YieldingSupervisor::default().check_in(progress(2));
    }
}
