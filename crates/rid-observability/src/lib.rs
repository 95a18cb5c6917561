use metrics_exporter_prometheus::PrometheusBuilder;
use rid_core::{DenialReason, RecordTable, Verdict};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

pub const VERDICTS_TOTAL: &str = "geofence_verdicts_total";
pub const RETAINED_RECORDS: &str = "geofence_retained_records";
pub const INGESTION_FAILURES_TOTAL: &str = "geofence_ingestion_failures_total";

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub service_name: String,
    pub log_level: String,
    pub metrics_addr: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ObservabilityHandle {
    pub service_name: String,
    pub metrics_enabled: bool,
}

/// Installs the global subscriber, writing to stderr so stdout stays free for verdicts.
pub fn init(config: &ObservabilityConfig) -> ObservabilityHandle {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);

    let metrics_enabled = init_metrics(config);

    ObservabilityHandle {
        service_name: config.service_name.clone(),
        metrics_enabled,
    }
}

pub fn log_startup(handle: &ObservabilityHandle, data_dir: &str) {
    tracing::info!(
        service = %handle.service_name,
        data_dir = %data_dir,
        metrics_enabled = handle.metrics_enabled,
        "geofence service starting"
    );
}

pub fn record_verdict(verdict: &Verdict) {
    metrics::counter!(VERDICTS_TOTAL, "reason" => reason_label(verdict.reason)).increment(1);
}

pub fn record_retained(table: RecordTable, count: usize) {
    metrics::gauge!(RETAINED_RECORDS, "table" => table.to_string()).set(count as f64);
}

pub fn record_ingestion_failure() {
    metrics::counter!(INGESTION_FAILURES_TOTAL).increment(1);
}

pub fn reason_label(reason: DenialReason) -> &'static str {
    match reason {
        DenialReason::NoBan => "none",
        DenialReason::Airport => "airport",
        DenialReason::Country => "country",
        DenialReason::Prison => "prison",
        DenialReason::FileError => "file_error",
        DenialReason::Gps => "gps",
    }
}

fn init_metrics(config: &ObservabilityConfig) -> bool {
    let Some(addr) = config.metrics_addr.as_ref() else {
        return false;
    };
    let addr: SocketAddr = match addr.parse() {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(
                service = %config.service_name,
                error = %err,
                "Invalid RID_METRICS_ADDR value"
            );
            return false;
        }
    };

    let builder = PrometheusBuilder::new()
        .with_http_listener(addr)
        .add_global_label("service", config.service_name.clone());

    match builder.install() {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(
                service = %config.service_name,
                error = %err,
                "Failed to initialize Prometheus exporter"
            );
            false
        }
    }
}
