use std::path::Path;

use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use trip_metrics_lib::summary::TripSummary;

/// The fixed report block, one info line per figure.
pub fn log_summary(summary: &TripSummary) {
    tracing::info!("===== TRIP SUMMARY =====");
    match summary.start_position {
        Some(start) => {
            tracing::info!("Start position: x={:.2}, y={:.2}", start.x(), start.y())
        }
        None => tracing::info!("Start position: unknown"),
    }
    tracing::info!(
        "Goal position: x={:.2}, y={:.2}",
        summary.goal_position.x(),
        summary.goal_position.y()
    );
    tracing::info!(
        "Final position: x={:.2}, y={:.2}",
        summary.final_position.x(),
        summary.final_position.y()
    );
    tracing::info!("Total distance traveled: {:.2} m", summary.total_distance);
    tracing::info!("Total time elapsed: {:.2} s", summary.elapsed_seconds);
    tracing::info!("Average speed: {:.2} m/s", summary.average_speed);
    tracing::info!("Positioning error: {:.2} cm", summary.error_cm);
    tracing::info!("========================");
}

/// Appends summaries to a file, one JSON object per line.
pub struct SummarySink {
    file: tokio::fs::File,
}

impl SummarySink {
    pub async fn open(path: &Path) -> Result<Self, anyhow::Error> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        Ok(SummarySink { file })
    }

    pub async fn append(&mut self, summary: &TripSummary) -> Result<(), anyhow::Error> {
        let mut line = serde_json::to_string(summary)?;
        line.push('\n');
        self.file.write_all(line.as_bytes()).await?;
        self.file.flush().await?;
        Ok(())
    }
}
