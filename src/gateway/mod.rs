use std::net::SocketAddr;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{ConnectInfo, State};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};

use crate::state::AppState;

pub async fn ws_upgrade(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, addr, state))
}

/// Per-connection task. The hub owns all shared state; this loop only
/// shuttles frames between the socket and the hub. The outbound channel is
/// the connection's single write path, and the hub dropping its sender (on
/// forced disconnect) ends the loop.
async fn handle_socket(socket: WebSocket, addr: SocketAddr, state: AppState) {
    let (mut ws_sink, mut ws_stream) = socket.split();

    let (user_id, mut rx) = state.hub.connect(addr.to_string()).await;
    tracing::trace!(user = user_id, %addr, "websocket connected");

    loop {
        tokio::select! {
            outbound = rx.recv() => {
                match outbound {
                    Some(frame) => {
                        if ws_sink.send(Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    // Sender dropped: the hub removed this user.
                    None => break,
                }
            }
            inbound = ws_stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        state.hub.handle_frame(user_id, &text).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::error!(user = user_id, "websocket error: {e}");
                        break;
                    }
                    // Ping/pong and binary frames carry nothing for the hub.
                    _ => {}
                }
            }
        }
    }

    state.hub.disconnect(user_id).await;
    tracing::trace!(user = user_id, %addr, "websocket closed");
}
