mod checker;
mod protocol;

use checker::{Checker, LoggingSupervisor};
use protocol::PositionReport;
use rid_config::{GeofenceConfig, ServiceConfig};
use rid_geofence::GeofenceEngine;
use rid_observability::{ObservabilityConfig, init, log_startup};
use rid_storage::DirectoryRecordSource;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

const REPORT_QUEUE: usize = 64;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServiceConfig::from_env("rid-checker");
    let obs_config = ObservabilityConfig {
        service_name: config.service_name.clone(),
        log_level: config.log_level.clone(),
        metrics_addr: config.metrics_addr.clone(),
    };
    let handle = init(&obs_config);
    log_startup(&handle, &config.data_dir);

    let geofence = GeofenceConfig::from_env();
    tracing::info!(?geofence, "geofence configuration loaded");
    let engine = GeofenceEngine::new(geofence, DirectoryRecordSource::new(&config.data_dir))
        .with_supervisor(LoggingSupervisor::new(Duration::ZERO));
    let checker = Checker::new(engine);

    let (report_tx, report_rx) = mpsc::channel(REPORT_QUEUE);
    let (verdict_tx, mut verdict_rx) = mpsc::channel(REPORT_QUEUE);
    let reader = tokio::spawn(read_reports(report_tx));
    let evaluator = checker.spawn(report_rx, verdict_tx);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut stdout = tokio::io::stdout();
    let mut interrupted = false;
    loop {
        tokio::select! {
            line = verdict_rx.recv() => {
                let Some(line) = line else {
                    break;
                };
                let mut payload = serde_json::to_vec(&line)?;
                payload.push(b'\n');
                stdout.write_all(&payload).await?;
                stdout.flush().await?;
            }
            result = &mut shutdown => {
                if let Err(err) = result {
                    tracing::error!("failed to install ctrl-c handler: {}", err);
                }
                interrupted = true;
                break;
            }
        }
    }

    if interrupted {
        reader.abort();
    }
    match reader.await {
        Ok(Ok(())) => tracing::info!("input closed"),
        Ok(Err(err)) => tracing::error!(error = %err, "failed reading position reports"),
        Err(err) if err.is_cancelled() => {}
        Err(err) => tracing::error!(error = %err, "report reader panicked"),
    }

    // the evaluator sees the closed queues after any scan in progress
    drop(verdict_rx);
    if let Err(err) = evaluator.await {
        tracing::error!(error = %err, "evaluator panicked");
    }
    Ok(())
}

/// Parses JSON position reports from stdin into the queue until EOF.
async fn read_reports(tx: mpsc::Sender<PositionReport>) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<PositionReport>(&line) {
            Ok(report) => {
                if tx.send(report).await.is_err() {
                    break;
                }
            }
            Err(err) => tracing::warn!(error = %err, "skipping malformed position report"),
        }
    }
    Ok(())
}
