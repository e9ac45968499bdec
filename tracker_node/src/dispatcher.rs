use std::sync::Arc;

use tokio::sync::mpsc;
use trip_metrics_lib::{events::TrackerEvent, tracker::TripTracker};

use crate::{
    node_state::NodeState,
    report::{self, SummarySink},
};

/// Owns the tracker. Events from every connection funnel through one
/// channel, so handlers never run concurrently and the accumulated state
/// needs no lock.
pub async fn run(
    state: Arc<NodeState>,
    mut event_rx: mpsc::Receiver<TrackerEvent>,
    mut sink: Option<SummarySink>,
) {
    let mut tracker = TripTracker::new();

    while let Some(event) = event_rx.recv().await {
        let stamped_at = state.clock.now();
        if let Some(summary) = tracker.handle(event, stamped_at) {
            report::log_summary(&summary);
            if let Some(sink) = sink.as_mut() {
                if let Err(err) = sink.append(&summary).await {
                    tracing::error!("Failed to append summary: {err:?}");
                }
            }
            // Nobody subscribed is fine, receivers come and go.
            let _ = state.summary_tx.send(summary);
        }
    }

    tracing::info!("Event channel closed, dispatcher stopping");
}
