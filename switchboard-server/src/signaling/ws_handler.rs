use crate::signaling::{PeerSink, SignalingService, SinkReceiver};
use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, close_code};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use switchboard_core::PeerId;
use tracing::{error, info, warn};

/// How long an overflowing connection gets to take its Close frame.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    let max_message_bytes = service.config().max_message_bytes;

    ws.max_message_size(max_message_bytes)
        .on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let (sender, receiver) = socket.split();
    let (sink, outbox) = PeerSink::channel(service.config().max_queued_bytes);

    let peer_id = match service.connect(sink.clone()).await {
        Ok(peer_id) => peer_id,
        Err(e) => {
            error!("Could not register WebSocket connection: {}", e);
            return;
        }
    };
    info!("New WebSocket connection: {}", peer_id);

    let mut send_task = tokio::spawn(write_frames(sender, outbox, sink, peer_id.clone()));
    let mut recv_task = tokio::spawn(read_frames(receiver, service.clone(), peer_id.clone()));

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // Anything the aborted reader still manages to queue is dropped by the
    // relay as coming from an unknown peer.
    if let Err(e) = service.disconnect(peer_id.clone()).await {
        error!("Failed to clean up {}: {}", peer_id, e);
    }
    info!("WebSocket disconnected: {}", peer_id);
}

/// Drains the outbox onto the socket until either side goes away. An
/// overflowed sink ends the connection with a policy Close frame, even if
/// the socket is stuck mid-write.
async fn write_frames(
    mut sender: SplitSink<WebSocket, Message>,
    mut outbox: SinkReceiver,
    sink: PeerSink,
    peer_id: PeerId,
) {
    loop {
        let text = tokio::select! {
            biased;
            _ = sink.overflowed() => break,
            next = outbox.recv() => match next {
                Some(text) => text,
                None => {
                    let _ = sender.close().await;
                    return;
                }
            },
        };

        let sent = tokio::select! {
            biased;
            _ = sink.overflowed() => break,
            sent = sender.send(Message::Text(text.into())) => sent,
        };
        if sent.is_err() {
            return;
        }
    }

    warn!("Outbound queue for {} overflowed, closing connection", peer_id);
    let frame = CloseFrame {
        code: close_code::POLICY,
        reason: Utf8Bytes::from_static("outbound queue overflow"),
    };
    match tokio::time::timeout(CLOSE_TIMEOUT, sender.send(Message::Close(Some(frame)))).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Could not send Close to {}: {}", peer_id, e),
        Err(_) => warn!("Timed out sending Close to {}", peer_id),
    }
}

async fn read_frames(
    mut receiver: SplitStream<WebSocket>,
    service: SignalingService,
    peer_id: PeerId,
) {
    while let Some(frame) = receiver.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text.as_str().to_owned(),
            Ok(Message::Binary(data)) => match String::from_utf8(data.to_vec()) {
                Ok(text) => text,
                Err(_) => {
                    warn!("Ignoring non-UTF-8 binary frame from {}", peer_id);
                    continue;
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!("WebSocket read error from {}: {}", peer_id, e);
                break;
            }
        };

        if let Err(e) = service.forward(peer_id.clone(), text).await {
            error!("Relay died: {}", e);
            break;
        }
    }
}
