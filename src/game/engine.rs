use super::types::{GameState, Point};

/// Result of advancing a session by one tick. Exactly one of the two
/// variants is produced per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
  Running,
  /// Terminal result. `Some(n)` names the winning player, `None` is a
  /// solo game-over or a draw.
  Finished(Option<u8>),
}

/// Advances the state by one tick: moves every player with a non-zero
/// velocity, resolves food consumption, and detects collisions.
///
/// Collisions are evaluated against pre-tick bodies for every moving
/// player before anyone moves, so the result does not depend on player
/// order. A single loser hands the win to the other player; two losers
/// in the same tick are a draw.
pub fn advance(state: &mut GameState) -> TickOutcome {
  let moving: Vec<usize> = state
    .players
    .iter()
    .enumerate()
    .filter(|(_, player)| player.vel != Point::ZERO)
    .map(|(index, _)| index)
    .collect();
  if moving.is_empty() {
    return TickOutcome::Running;
  }

  let bodies: Vec<Vec<Point>> = state
    .players
    .iter()
    .map(|player| player.snake.clone())
    .collect();

  let mut losers: Vec<usize> = Vec::new();
  for &index in &moving {
    let player = &state.players[index];
    let candidate = player.head().translated(player.vel);
    if hits_wall(candidate, state.grid_size) || hits_any_body(candidate, &bodies) {
      losers.push(index);
    }
  }
  if !losers.is_empty() {
    return TickOutcome::Finished(survivor(state, &losers));
  }

  for &index in &moving {
    let candidate = {
      let player = &state.players[index];
      player.head().translated(player.vel)
    };
    if candidate == state.food {
      state.players[index].snake.insert(0, candidate);
      match state.random_free_cell() {
        Some(cell) => state.food = cell,
        // Board full: the player that just ate takes the win.
        None => return TickOutcome::Finished(eater_wins(state, index)),
      }
    } else {
      state.players[index].snake.insert(0, candidate);
      state.players[index].snake.pop();
    }
  }

  TickOutcome::Running
}

fn hits_wall(cell: Point, grid_size: i32) -> bool {
  cell.x < 0 || cell.x >= grid_size || cell.y < 0 || cell.y >= grid_size
}

fn hits_any_body(cell: Point, bodies: &[Vec<Point>]) -> bool {
  bodies.iter().any(|body| body.contains(&cell))
}

fn survivor(state: &GameState, losers: &[usize]) -> Option<u8> {
  if state.is_solo || losers.len() == state.players.len() {
    return None;
  }
  if losers.contains(&0) {
    Some(2)
  } else {
    Some(1)
  }
}

fn eater_wins(state: &GameState, index: usize) -> Option<u8> {
  if state.is_solo {
    None
  } else {
    Some(index as u8 + 1)
  }
}
