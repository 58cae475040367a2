use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, trace, warn};

use tinig_types::events::SkyEvent;

use crate::dispatcher::Dispatcher;

/// Heartbeat interval: server sends a Ping every 15 seconds.
/// If 2 consecutive Pongs are missed (~30s), the connection is dropped.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Serve one browser: greet it with the current mode, then relay sky
/// events until either side goes away.
pub async fn handle_connection(socket: WebSocket, dispatcher: Dispatcher, night: bool) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before greeting so nothing broadcast in between is missed
    let mut broadcast_rx = dispatcher.subscribe();
    info!("Sky watcher connected ({} listening)", dispatcher.listeners());

    let greeting = SkyEvent::ModeChange { night };
    if send_event(&mut sender, &greeting).await.is_err() {
        return;
    }

    let pong_received = Arc::new(AtomicBool::new(true));
    let pong_flag_send = pong_received.clone();
    let pong_flag_recv = pong_received;

    let mut send_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;
        let mut missed_heartbeats: u8 = 0;

        loop {
            tokio::select! {
                result = broadcast_rx.recv() => {
                    let event = match result {
                        Ok(event) => event,
                        Err(RecvError::Lagged(n)) => {
                            warn!("Broadcast receiver lagged by {} events", n);
                            continue;
                        }
                        Err(RecvError::Closed) => break,
                    };

                    if event.is_ambient() {
                        trace!("Relaying {:?}", event);
                    } else {
                        debug!("Relaying {:?}", event);
                    }
                    if send_event(&mut sender, &event).await.is_err() {
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if pong_flag_send.swap(false, Ordering::Acquire) {
                        missed_heartbeats = 0;
                    } else {
                        missed_heartbeats += 1;
                        if missed_heartbeats >= 2 {
                            warn!("Heartbeat timeout (missed {} pongs), dropping connection", missed_heartbeats);
                            break;
                        }
                    }
                    if sender.send(Message::Ping(Default::default())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // The sky is read-only over the socket; only liveness frames matter
    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            match frame {
                Ok(Message::Pong(_)) => pong_flag_recv.store(true, Ordering::Release),
                Ok(Message::Close(_)) => break,
                Ok(other) => trace!("Ignoring client frame: {:?}", other),
                Err(e) => {
                    debug!("WebSocket read error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("Sky watcher disconnected");
}

async fn send_event<S>(sender: &mut S, event: &SkyEvent) -> Result<(), ()>
where
    S: Sink<Message> + Unpin,
{
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to encode sky event: {}", e);
            return Ok(());
        }
    };
    sender.send(Message::Text(text.into())).await.map_err(|_| ())
}
