use tokio::{
    io::AsyncReadExt,
    net::{TcpListener, TcpStream},
    sync::mpsc,
};
use trip_metrics_lib::events::{MAX_FRAME_LEN, TrackerEvent};

pub async fn listen(listener: TcpListener, event_tx: mpsc::Sender<TrackerEvent>) {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("listening on {}", addr);
    }

    loop {
        let Ok((stream, addr)) = listener.accept().await else {
            tracing::error!("Failed to accept connection");
            continue;
        };

        tracing::info!("New connection from {}", addr);

        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            let res = handle_connection(stream, event_tx).await;
            tracing::info!("Connection from {} ended with result: {:?}", addr, res);
        });
    }
}

pub async fn handle_connection(
    mut stream: TcpStream,
    event_tx: mpsc::Sender<TrackerEvent>,
) -> Result<(), anyhow::Error> {
    // Each frame is a 4 byte big endian length followed by one bincode
    // encoded TrackerEvent. Anything malformed kills the connection; the
    // publisher just reconnects.
    let mut buffer = [0; MAX_FRAME_LEN as usize];

    loop {
        let mut len_buf = [0; 4];
        if stream.read_exact(&mut len_buf).await.is_err() {
            // Publisher hung up.
            break;
        }
        let len = u32::from_be_bytes(len_buf);

        if len == 0 || len > MAX_FRAME_LEN {
            return Err(anyhow::anyhow!("Frame length {} is out of range", len));
        }

        stream.read_exact(&mut buffer[..len as usize]).await?;

        let event = TrackerEvent::try_from(&buffer[..len as usize])
            .map_err(|err| anyhow::anyhow!(err))?;

        if event_tx.send(event).await.is_err() {
            // Dispatcher is gone, the node is shutting down.
            break;
        }
    }

    Ok(())
}
