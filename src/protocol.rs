use crate::game::types::GameState;
use serde::{Deserialize, Serialize};

/// Events arriving from a client over the websocket, one JSON object
/// per text frame.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
  NewMultiplayerGame,
  NewSoloGame,
  JoinGame { code: String },
  DirectionalInput { code: i32 },
  RequestRematch,
}

/// Events sent to clients in a room.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
  AssignedPlayerIndex { number: u8 },
  RoomCode { code: String },
  Mode { mode: GameMode },
  StateUpdate { state: GameState },
  GameOver { winner: Option<u8> },
  RematchStarted,
  RoomNotFound,
  RoomFull,
  ParticipantDisconnected,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
  Solo,
  Multiplayer,
}

pub fn decode_client_event(text: &str) -> Option<ClientEvent> {
  serde_json::from_str(text).ok()
}

impl ServerEvent {
  pub fn encode(&self) -> String {
    serde_json::to_string(self).unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_every_inbound_event() {
    assert!(matches!(
      decode_client_event(r#"{"type":"new-multiplayer-game"}"#),
      Some(ClientEvent::NewMultiplayerGame)
    ));
    assert!(matches!(
      decode_client_event(r#"{"type":"new-solo-game"}"#),
      Some(ClientEvent::NewSoloGame)
    ));
    match decode_client_event(r#"{"type":"join-game","code":"ab12c"}"#) {
      Some(ClientEvent::JoinGame { code }) => assert_eq!(code, "ab12c"),
      other => panic!("unexpected decode: {other:?}"),
    }
    match decode_client_event(r#"{"type":"directional-input","code":38}"#) {
      Some(ClientEvent::DirectionalInput { code }) => assert_eq!(code, 38),
      other => panic!("unexpected decode: {other:?}"),
    }
    assert!(matches!(
      decode_client_event(r#"{"type":"request-rematch"}"#),
      Some(ClientEvent::RequestRematch)
    ));
  }

  #[test]
  fn malformed_frames_decode_to_none() {
    assert!(decode_client_event("not json").is_none());
    assert!(decode_client_event(r#"{"type":"reboot-server"}"#).is_none());
    assert!(decode_client_event(r#"{"type":"join-game"}"#).is_none());
  }

  #[test]
  fn outbound_events_use_kebab_case_tags() {
    let encoded = ServerEvent::RoomNotFound.encode();
    assert_eq!(encoded, r#"{"type":"room-not-found"}"#);
    let encoded = ServerEvent::AssignedPlayerIndex { number: 2 }.encode();
    assert!(encoded.contains(r#""type":"assigned-player-index""#));
    assert!(encoded.contains(r#""number":2"#));
  }

  #[test]
  fn game_over_carries_a_nullable_winner() {
    let encoded = ServerEvent::GameOver { winner: None }.encode();
    assert!(encoded.contains(r#""winner":null"#));
    let encoded = ServerEvent::GameOver { winner: Some(1) }.encode();
    assert!(encoded.contains(r#""winner":1"#));
  }

  #[test]
  fn state_update_embeds_the_full_snapshot() {
    let event = ServerEvent::StateUpdate {
      state: GameState::new(true),
    };
    let value: serde_json::Value =
      serde_json::from_str(&event.encode()).expect("event should round-trip as json");
    assert_eq!(value["type"], "state-update");
    assert_eq!(value["state"]["isSolo"], true);
    assert!(value["state"]["gridsize"].is_number());
    assert!(value["state"]["players"][0]["snake"].is_array());
  }

  #[test]
  fn mode_serializes_lowercase() {
    let encoded = ServerEvent::Mode {
      mode: GameMode::Multiplayer,
    }
    .encode();
    assert!(encoded.contains(r#""mode":"multiplayer""#));
  }
}
