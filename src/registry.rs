use crate::game::constants::IDLE_ROOM_TIMEOUT_MS;
use crate::game::session::GameSession;
use crate::shared::codes::generate_room_code;
use crate::shared::time::now_millis;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinError {
  RoomNotFound,
  RoomFull,
}

/// Owns every live session, keyed by room code. Sessions are created
/// and destroyed only through the registry; lookups never contend
/// across rooms.
#[derive(Debug, Default)]
pub struct RoomRegistry {
  rooms: DashMap<String, Arc<GameSession>>,
}

impl RoomRegistry {
  pub fn new() -> Self {
    Self {
      rooms: DashMap::new(),
    }
  }

  pub fn room_count(&self) -> usize {
    self.rooms.len()
  }

  pub async fn create_solo(
    &self,
    connection_id: Uuid,
    sender: UnboundedSender<String>,
  ) -> (String, Arc<GameSession>) {
    self.create_session(true, connection_id, sender).await
  }

  pub async fn create_multiplayer(
    &self,
    connection_id: Uuid,
    sender: UnboundedSender<String>,
  ) -> (String, Arc<GameSession>) {
    self.create_session(false, connection_id, sender).await
  }

  async fn create_session(
    &self,
    is_solo: bool,
    connection_id: Uuid,
    sender: UnboundedSender<String>,
  ) -> (String, Arc<GameSession>) {
    let code = loop {
      let candidate = generate_room_code();
      if !self.rooms.contains_key(&candidate) {
        break candidate;
      }
    };
    let session = Arc::new(GameSession::new(code.clone(), is_solo));
    session.add_participant(connection_id, sender).await;
    self.rooms.insert(code.clone(), Arc::clone(&session));
    tracing::debug!(code = %code, is_solo, "room created");
    (code, session)
  }

  /// Adds the caller to an existing room as player 2.
  pub async fn join(
    &self,
    code: &str,
    connection_id: Uuid,
    sender: UnboundedSender<String>,
  ) -> Result<(Arc<GameSession>, u8), JoinError> {
    let session = self
      .rooms
      .get(code)
      .map(|entry| Arc::clone(entry.value()))
      .ok_or(JoinError::RoomNotFound)?;
    let number = session
      .add_joiner(connection_id, sender)
      .await
      .ok_or(JoinError::RoomFull)?;
    tracing::debug!(code = %code, number, "participant joined room");
    Ok((session, number))
  }

  /// Removes a participant; the registry entry goes with the last one.
  pub async fn leave(&self, code: &str, connection_id: Uuid) {
    let Some(session) = self.rooms.get(code).map(|entry| Arc::clone(entry.value())) else {
      return;
    };
    if session.remove_participant(connection_id).await {
      self.rooms.remove(code);
      tracing::debug!(code = %code, "room removed");
    }
  }

  /// Periodic sweep for rooms that emptied without a clean leave.
  pub async fn garbage_collect(&self) {
    self.sweep(now_millis()).await;
  }

  async fn sweep(&self, now: i64) {
    let sessions: Vec<(String, Arc<GameSession>)> = self
      .rooms
      .iter()
      .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
      .collect();
    for (code, session) in sessions {
      if session.deactivate_if_idle(now, IDLE_ROOM_TIMEOUT_MS).await {
        self.rooms.remove(&code);
        tracing::debug!(code = %code, "idle room collected");
      }
    }
  }
}
