use std::sync::Arc;

use tokio::sync::broadcast;
use trip_metrics_lib::{clock::Clock, summary::TripSummary};

pub struct NodeState {
    // Channel used to fan finished summaries out to attached sinks.
    pub summary_tx: broadcast::Sender<TripSummary>,
    // Wall clock behind event timestamps. Tests swap in a fixed one.
    pub clock: Arc<dyn Clock>,
}
