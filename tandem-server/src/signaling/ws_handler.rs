use crate::relay::RelayHandle;
use crate::signaling::AppState;
use crate::transport::Outbound;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let relay = state.relay.clone();

    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

async fn handle_socket(socket: WebSocket, relay: RelayHandle) {
    let (id, mut outbound_rx) = match relay.connect().await {
        Ok(accepted) => accepted,
        Err(e) => {
            error!("Rejecting WebSocket connection: {}", e);
            return;
        }
    };
    info!("New WebSocket connection: {}", id);

    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(item) = outbound_rx.recv().await {
            let msg = match item {
                Outbound::Signal(signal) => match serde_json::to_string(&signal) {
                    Ok(json) => Message::Text(json.into()),
                    Err(e) => {
                        error!("Failed to serialize signal message: {}", e);
                        continue;
                    }
                },
                Outbound::Probe => Message::Ping(Bytes::new()),
                Outbound::Close => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            };

            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let relay = relay.clone();

        async move {
            while let Some(frame) = receiver.next().await {
                let delivered = match frame {
                    Ok(Message::Text(text)) => relay.frame(id, text.as_str()).await,
                    Ok(Message::Binary(data)) => {
                        relay
                            .frame(id, String::from_utf8_lossy(&data).into_owned())
                            .await
                    }
                    Ok(Message::Pong(_)) => relay.probe_response(id).await,
                    Ok(Message::Ping(_)) => Ok(()),
                    Ok(Message::Close(_)) => break,
                    Err(e) => {
                        warn!("WebSocket error on {}: {}", id, e);
                        break;
                    }
                };

                if let Err(e) = delivered {
                    error!("Relay unavailable for {}: {}", id, e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    if relay.disconnect(id).await.is_err() {
        debug!("Relay already stopped when {} disconnected", id);
    }
    info!("WebSocket disconnected: {}", id);
}
