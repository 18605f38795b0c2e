use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use serde::Deserialize;

use kernel::model::{
    auth::{AccessToken, Principal},
    event::GroupEvent,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

#[derive(Deserialize)]
pub struct WsQuery {
    token: String,
}

/// WebSocket はヘッダーを自由に付けられないクライアントがあるため、
/// クエリパラメータのトークンで認証してからアップグレードする。
pub async fn connect_ws(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Response> {
    let principal = registry
        .auth_repository()
        .fetch_principal(AccessToken(query.token))
        .await?
        .ok_or(AppError::UnauthenticatedError)?;

    Ok(ws.on_upgrade(move |socket| serve_connection(socket, registry, principal)))
}

async fn serve_connection(mut socket: WebSocket, registry: AppRegistry, principal: Principal) {
    let hub = registry.broadcast_hub();
    let mut subscription = hub.subscribe(principal.group_id);

    let connected = GroupEvent::Connected {
        user_id: principal.user_id,
        group_id: principal.group_id,
    };
    if send_event(&mut socket, &connected).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            event = subscription.recv() => {
                let Some(event) = event else { break };
                if send_event(&mut socket, &event).await.is_err() {
                    break;
                }
            }
            message = socket.recv() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        if send_event(&mut socket, &GroupEvent::Echo(text)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // ping/pong は axum 側で応答される
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "websocket receive error");
                        break;
                    }
                }
            }
        }
    }

    tracing::info!(user_id = %principal.user_id, group_id = %principal.group_id, "websocket closed");
    // subscription の drop で購読が解除される
}

async fn send_event(socket: &mut WebSocket, event: &GroupEvent) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(text) => socket.send(Message::Text(text)).await,
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize websocket event");
            Ok(())
        }
    }
}
