use std::{fs::OpenOptions, path::PathBuf, sync::Arc};

use clap::Parser;
use tokio::{
    net::TcpListener,
    sync::{broadcast, mpsc},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trip_metrics_lib::clock::SystemClock;

use crate::node_state::NodeState;

mod dispatcher;
mod ingest;
mod node_state;
mod report;

#[derive(Parser)]
#[command(name = "TrackerNode")]
#[command(about = "Turns robot pose, goal and localization streams into trip summaries", long_about = None)]
struct Args {
    /// Address the event endpoint listens on
    #[arg(long, default_value = "127.0.0.1:6021")]
    listen: String,
    /// Append every summary as a JSON line to this file
    #[arg(long)]
    summary_log: Option<PathBuf>,
    /// Mirror log output into this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let file_layer = args.log_file.as_ref().map(|path| {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .unwrap();
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Arc::new(file))
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| {
                format!("{}=trace,trip_metrics_lib=debug", env!("CARGO_CRATE_NAME")).into()
            })
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    tracing::info!("Starting tracker node...");

    let (summary_tx, _rx) = broadcast::channel(100);
    let (event_tx, event_rx) = mpsc::channel(1024);

    let state = Arc::new(NodeState {
        summary_tx,
        clock: Arc::new(SystemClock),
    });

    let sink = match &args.summary_log {
        Some(path) => {
            tracing::info!("Appending summaries to {}", path.display());
            Some(report::SummarySink::open(path).await.unwrap())
        }
        None => None,
    };

    let listener = TcpListener::bind(&args.listen).await.unwrap();

    tokio::spawn(ingest::listen(listener, event_tx));

    dispatcher::run(state, event_rx, sink).await;
}
