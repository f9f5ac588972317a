use crate::game::session::GameSession;
use crate::protocol::{self, ClientEvent, GameMode, ServerEvent};
use crate::registry::{JoinError, RoomRegistry};
use crate::shared::codes::normalize_room_code;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use uuid::Uuid;

struct Binding {
    session: Arc<GameSession>,
    player_number: u8,
}

/// Runs one websocket connection: an outbound pump draining the
/// participant channel, and an inbound loop dispatching client events.
/// On disconnect the connection is detached from its room.
pub async fn handle_socket(socket: WebSocket, registry: Arc<RoomRegistry>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let connection_id = Uuid::new_v4();

    let send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    let mut binding: Option<Binding> = None;

    while let Some(result) = receiver.next().await {
        let Ok(message) = result else { break };
        match message {
            Message::Text(text) => {
                handle_client_event(&registry, &tx, connection_id, &mut binding, &text).await;
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    if let Some(bound) = binding {
        registry.leave(bound.session.code(), connection_id).await;
    }
    send_task.abort();
}

async fn handle_client_event(
    registry: &Arc<RoomRegistry>,
    tx: &UnboundedSender<String>,
    connection_id: Uuid,
    binding: &mut Option<Binding>,
    text: &str,
) {
    let Some(event) = protocol::decode_client_event(text) else { return };
    match event {
        ClientEvent::NewMultiplayerGame => {
            if binding.is_some() {
                return;
            }
            let (code, session) = registry.create_multiplayer(connection_id, tx.clone()).await;
            send(tx, &ServerEvent::RoomCode { code });
            send(tx, &ServerEvent::AssignedPlayerIndex { number: 1 });
            send(tx, &ServerEvent::Mode { mode: GameMode::Multiplayer });
            // Ticking waits for player 2.
            *binding = Some(Binding { session, player_number: 1 });
        }
        ClientEvent::NewSoloGame => {
            if binding.is_some() {
                return;
            }
            let (_code, session) = registry.create_solo(connection_id, tx.clone()).await;
            send(tx, &ServerEvent::AssignedPlayerIndex { number: 1 });
            send(tx, &ServerEvent::Mode { mode: GameMode::Solo });
            session.ensure_loop();
            *binding = Some(Binding { session, player_number: 1 });
        }
        ClientEvent::JoinGame { code } => {
            if binding.is_some() {
                return;
            }
            let Some(code) = normalize_room_code(&code) else {
                send(tx, &ServerEvent::RoomNotFound);
                return;
            };
            match registry.join(&code, connection_id, tx.clone()).await {
                Ok((session, number)) => {
                    send(tx, &ServerEvent::AssignedPlayerIndex { number });
                    send(tx, &ServerEvent::RoomCode { code });
                    send(tx, &ServerEvent::Mode { mode: GameMode::Multiplayer });
                    session.ensure_loop();
                    *binding = Some(Binding {
                        session,
                        player_number: number,
                    });
                }
                Err(JoinError::RoomNotFound) => send(tx, &ServerEvent::RoomNotFound),
                Err(JoinError::RoomFull) => send(tx, &ServerEvent::RoomFull),
            }
        }
        ClientEvent::DirectionalInput { code } => {
            if let Some(bound) = binding {
                bound.session.apply_input(bound.player_number, code).await;
            }
        }
        ClientEvent::RequestRematch => {
            if let Some(bound) = binding {
                bound.session.rematch().await;
            }
        }
    }
}

fn send(tx: &UnboundedSender<String>, event: &ServerEvent) {
    let _ = tx.send(event.encode());
}
