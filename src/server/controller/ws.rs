use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use tokio::sync::broadcast::error::RecvError;

use crate::{
    model::stats::{PushEventDto, StatsDto},
    server::state::AppState,
};

/// Upgrades to a WebSocket that receives `statsUpdate` events.
///
/// A snapshot is sent on connect, then one per stats push interval.
pub async fn stats_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut updates = state.stats_tx.subscribe();
    tracing::debug!("Dashboard WebSocket connected");

    if send_stats(&mut socket, state.stats.snapshot().await).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(stats) => {
                    if send_stats(&mut socket, stats).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Dashboard WebSocket lagging behind stats updates");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::debug!("Dashboard WebSocket disconnected");
}

async fn send_stats(socket: &mut WebSocket, stats: StatsDto) -> Result<(), axum::Error> {
    let payload = match serde_json::to_string(&PushEventDto::stats_update(stats)) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("Failed to serialize stats update: {}", e);
            return Ok(());
        }
    };

    socket.send(Message::Text(payload.into())).await
}
