use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::StreamExt;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::state::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.campaign_events_tx.subscribe();

    info!("campaign feed client connected");

    let send_task = tokio::spawn(async move {
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "campaign feed client lagging; events dropped");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize campaign event for ws");
                    continue;
                }
            };

            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(_msg)) = receiver.next().await {}
    });

    join_first(send_task, recv_task).await;

    info!("campaign feed client disconnected");
}

/// Waits for either task, then aborts the other and waits for it to drop,
/// so its broadcast receiver is released with the socket.
async fn join_first(mut first: JoinHandle<()>, mut second: JoinHandle<()>) {
    tokio::select! {
        _ = &mut first => {
            second.abort();
            let _ = second.await;
        },
        _ = &mut second => {
            first.abort();
            let _ = first.await;
        },
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::broadcast;

    use super::join_first;

    #[tokio::test]
    async fn finished_peer_releases_the_subscriber() {
        let (tx, _unused_rx) = broadcast::channel::<u32>(4);
        let mut rx = tx.subscribe();
        assert_eq!(tx.receiver_count(), 2);

        let listener = tokio::spawn(async move { while rx.recv().await.is_ok() {} });
        let closed = tokio::spawn(async {});

        join_first(listener, closed).await;

        assert_eq!(tx.receiver_count(), 1);
    }
}
