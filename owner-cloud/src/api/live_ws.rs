//! Live WebSocket endpoint: availability push to owner dashboards
//!
//! GET /api/v1/live/ws?token=<JWT>
//! Auth: JWT in the query string (browser WebSocket cannot set headers)
//!
//! Protocol (server → client only):
//! - on connect and after a lag: one `restaurant_updated` per owned restaurant
//! - then every `LiveEvent` published for the owner

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::LiveEvent;
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::auth::{OwnerIdentity, authenticate_owner};
use crate::state::AppState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
pub struct WsAuthQuery {
    token: Option<String>,
}

/// GET /api/v1/live/ws?token=<JWT>
///
/// The token is checked before the upgrade so a rejected client gets the
/// JSON error envelope.
pub async fn handle_live_ws(
    State(state): State<AppState>,
    Query(query): Query<WsAuthQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<impl IntoResponse, AppError> {
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::with_message(ErrorCode::NotAuthenticated, "Missing token"))?;
    let identity = authenticate_owner(&token, &state.jwt_secret)?;

    let ws = ws.map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("WebSocket upgrade required: {e}"))
    })?;
    Ok(ws.on_upgrade(move |socket| live_ws_session(socket, state, identity)))
}

async fn live_ws_session(socket: WebSocket, state: AppState, identity: OwnerIdentity) {
    let owner_id = identity.user_id;
    let (mut sink, mut stream) = socket.split();
    let mut hub_rx = state.live.subscribe(owner_id);

    tracing::info!(owner_id, "Live WS connected");

    if send_snapshot(&mut sink, &state, owner_id).await.is_err() {
        drop(hub_rx);
        state.live.prune(owner_id);
        return;
    }

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = hub_rx.recv() => {
                match event {
                    Ok(event) => {
                        if send_event(&mut sink, &event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(owner_id, lagged = n, "Live subscriber lagged, resending snapshot");
                        hub_rx = state.live.subscribe(owner_id);
                        if send_snapshot(&mut sink, &state, owner_id).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(owner_id, error = %e, "Live WS receive error");
                        break;
                    }
                    // Pong and client text are ignored
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    drop(hub_rx);
    state.live.prune(owner_id);
    tracing::info!(owner_id, "Live WS disconnected");
}

type WsSink = SplitSink<WebSocket, Message>;

async fn send_event(sink: &mut WsSink, event: &LiveEvent) -> Result<(), ()> {
    let json = serde_json::to_string(event).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize live event");
    })?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}

async fn send_snapshot(sink: &mut WsSink, state: &AppState, owner_id: i64) -> Result<(), ()> {
    let restaurants = match state.store.list_by_owner(owner_id).await {
        Ok(restaurants) => restaurants,
        Err(e) => {
            // Live events still flow; the dashboard can refetch over REST
            tracing::warn!(owner_id, error = %e, "Failed to load live snapshot");
            return Ok(());
        }
    };
    for restaurant in restaurants {
        let event = LiveEvent::RestaurantUpdated {
            restaurant: Box::new(restaurant),
        };
        send_event(sink, &event).await?;
    }
    Ok(())
}
