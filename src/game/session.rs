use super::constants::{MAX_PARTICIPANTS, TICK_MS};
use super::engine::{self, TickOutcome};
use super::input::parse_direction;
use super::types::{GameState, Point};
use crate::protocol::ServerEvent;
use crate::shared::time::now_millis;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use uuid::Uuid;

/// One isolated game instance: its state, up to two participants, and
/// the tick driver that advances it. All mutation funnels through the
/// state mutex; the driver is the only caller of `advance` and stops
/// strictly after the in-flight tick when the session deactivates.
#[derive(Debug)]
pub struct GameSession {
  code: String,
  state: Mutex<SessionState>,
  running: AtomicBool,
}

#[derive(Debug)]
struct Participant {
  connection_id: Uuid,
  sender: UnboundedSender<String>,
}

#[derive(Debug)]
struct SessionState {
  game: GameState,
  participants: [Option<Participant>; MAX_PARTICIPANTS],
  active: bool,
  empty_since: Option<i64>,
}

impl GameSession {
  pub fn new(code: String, is_solo: bool) -> Self {
    Self {
      code,
      state: Mutex::new(SessionState {
        game: GameState::new(is_solo),
        participants: [None, None],
        active: true,
        empty_since: Some(now_millis()),
      }),
      running: AtomicBool::new(false),
    }
  }

  pub fn code(&self) -> &str {
    &self.code
  }

  /// Claims the lowest free slot and returns the 1-based player
  /// number, `None` when the session is at capacity. Solo sessions
  /// hold a single slot.
  pub async fn add_participant(
    &self,
    connection_id: Uuid,
    sender: UnboundedSender<String>,
  ) -> Option<u8> {
    let mut state = self.state.lock().await;
    let capacity = state.game.players.len();
    let slot = state
      .participants
      .iter()
      .take(capacity)
      .position(|slot| slot.is_none())?;
    state.participants[slot] = Some(Participant {
      connection_id,
      sender,
    });
    state.empty_since = None;
    tracing::debug!(code = %self.code, slot, "participant joined");
    Some(slot as u8 + 1)
  }

  /// Claims the joiner slot. Joiners are always player 2, even when
  /// the creator has since left and slot 1 is free again; a taken
  /// joiner slot (or a solo room) reads as full.
  pub async fn add_joiner(
    &self,
    connection_id: Uuid,
    sender: UnboundedSender<String>,
  ) -> Option<u8> {
    let mut state = self.state.lock().await;
    if state.game.is_solo || state.participants[1].is_some() {
      return None;
    }
    state.participants[1] = Some(Participant {
      connection_id,
      sender,
    });
    state.empty_since = None;
    tracing::debug!(code = %self.code, "joiner took slot 2");
    Some(2)
  }

  /// Deactivates the session and notifies the remaining participant.
  /// Returns true when the room is now empty.
  pub async fn remove_participant(&self, connection_id: Uuid) -> bool {
    let mut state = self.state.lock().await;
    let Some(slot) = state.participants.iter().position(|entry| {
      entry
        .as_ref()
        .is_some_and(|participant| participant.connection_id == connection_id)
    }) else {
      return state.participant_count() == 0;
    };
    state.participants[slot] = None;
    state.active = false;
    tracing::debug!(code = %self.code, slot, "participant left");
    if state.participant_count() == 0 {
      state.empty_since = Some(now_millis());
      true
    } else {
      state.broadcast(&ServerEvent::ParticipantDisconnected);
      false
    }
  }

  /// Stores the mapped direction as the player's pending velocity.
  /// Unmapped codes and exact reversals of a non-zero stored velocity
  /// are dropped.
  pub async fn apply_input(&self, player_number: u8, control_code: i32) {
    let Some(vel) = parse_direction(control_code) else { return };
    let Some(index) = (player_number as usize).checked_sub(1) else { return };
    let mut state = self.state.lock().await;
    let Some(player) = state.game.players.get_mut(index) else { return };
    if player.vel != Point::ZERO && vel == player.vel.opposite() {
      return;
    }
    player.vel = vel;
  }

  /// Replaces the state wholesale, keeping mode and board size, and
  /// restarts the tick driver.
  pub async fn rematch(self: &Arc<Self>) {
    {
      let mut state = self.state.lock().await;
      if state.participant_count() == 0 {
        return;
      }
      let is_solo = state.game.is_solo;
      let grid_size = state.game.grid_size;
      state.game = GameState::with_grid(grid_size, is_solo);
      state.active = true;
      state.broadcast(&ServerEvent::RematchStarted);
      tracing::debug!(code = %self.code, "rematch started");
    }
    self.ensure_loop();
  }

  /// Starts the tick driver if it is not already running. Idempotent;
  /// the spawned task exits once the session deactivates or empties.
  pub fn ensure_loop(self: &Arc<Self>) {
    if self
      .running
      .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
      .is_err()
    {
      return;
    }

    let session = Arc::clone(self);
    tokio::spawn(async move {
      let mut interval = tokio::time::interval(std::time::Duration::from_millis(TICK_MS));
      loop {
        interval.tick().await;
        let mut state = session.state.lock().await;
        if !state.active || state.participant_count() == 0 {
          session.running.store(false, Ordering::SeqCst);
          break;
        }
        match engine::advance(&mut state.game) {
          TickOutcome::Running => {
            let event = ServerEvent::StateUpdate {
              state: state.game.clone(),
            };
            state.broadcast(&event);
          }
          TickOutcome::Finished(winner) => {
            state.active = false;
            state.broadcast(&ServerEvent::GameOver { winner });
            tracing::debug!(code = %session.code, ?winner, "game over");
            session.running.store(false, Ordering::SeqCst);
            break;
          }
        }
      }
    });
  }

  /// Garbage-collection probe: deactivates and reports true when the
  /// session has had zero participants for at least `timeout_ms`.
  pub async fn deactivate_if_idle(&self, now: i64, timeout_ms: i64) -> bool {
    let mut state = self.state.lock().await;
    if state.participant_count() > 0 {
      return false;
    }
    match state.empty_since {
      Some(since) if now - since >= timeout_ms => {
        state.active = false;
        true
      }
      Some(_) => false,
      None => {
        state.empty_since = Some(now);
        false
      }
    }
  }
}

impl SessionState {
  fn participant_count(&self) -> usize {
    self.participants.iter().flatten().count()
  }

  fn broadcast(&mut self, event: &ServerEvent) {
    let payload = event.encode();
    let mut stale = false;
    for slot in self.participants.iter_mut() {
      let dead = slot
        .as_ref()
        .is_some_and(|participant| participant.sender.send(payload.clone()).is_err());
      if dead {
        *slot = None;
        stale = true;
      }
    }
    if stale && self.participant_count() == 0 {
      self.active = false;
      self.empty_since = Some(now_millis());
    }
  }
}
