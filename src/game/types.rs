use super::constants::{GRID_SIZE, PLAYER_ONE_START, PLAYER_TWO_START};
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
  pub x: i32,
  pub y: i32,
}

impl Point {
  pub const ZERO: Point = Point { x: 0, y: 0 };

  pub fn translated(self, vel: Point) -> Point {
    Point {
      x: self.x + vel.x,
      y: self.y + vel.y,
    }
  }

  pub fn opposite(self) -> Point {
    Point {
      x: -self.x,
      y: -self.y,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerState {
  pub snake: Vec<Point>,
  pub vel: Point,
}

impl PlayerState {
  fn at(start: (i32, i32)) -> Self {
    Self {
      snake: vec![Point {
        x: start.0,
        y: start.1,
      }],
      vel: Point::ZERO,
    }
  }

  pub fn head(&self) -> Point {
    self.snake[0]
  }
}

/// Full per-session snapshot. Serialized field names match what the
/// frontend consumes (`gridsize`, `isSolo`).
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
  #[serde(rename = "gridsize")]
  pub grid_size: i32,
  pub food: Point,
  pub players: Vec<PlayerState>,
  #[serde(rename = "isSolo")]
  pub is_solo: bool,
}

impl GameState {
  pub fn new(is_solo: bool) -> Self {
    Self::with_grid(GRID_SIZE, is_solo)
  }

  pub fn with_grid(grid_size: i32, is_solo: bool) -> Self {
    let players = if is_solo {
      vec![PlayerState::at(PLAYER_ONE_START)]
    } else {
      vec![
        PlayerState::at(PLAYER_ONE_START),
        PlayerState::at(PLAYER_TWO_START),
      ]
    };
    let mut state = Self {
      grid_size,
      food: Point::ZERO,
      players,
      is_solo,
    };
    if let Some(cell) = state.random_free_cell() {
      state.food = cell;
    }
    state
  }

  pub fn occupied(&self, cell: Point) -> bool {
    self.players.iter().any(|player| player.snake.contains(&cell))
  }

  /// Uniformly random cell not covered by any snake, `None` when the
  /// board is full.
  pub fn random_free_cell(&self) -> Option<Point> {
    let mut free = Vec::new();
    for y in 0..self.grid_size {
      for x in 0..self.grid_size {
        let cell = Point { x, y };
        if !self.occupied(cell) {
          free.push(cell);
        }
      }
    }
    if free.is_empty() {
      return None;
    }
    let index = rand::thread_rng().gen_range(0..free.len());
    free.get(index).copied()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn solo_state_has_one_player() {
    let state = GameState::new(true);
    assert!(state.is_solo);
    assert_eq!(state.players.len(), 1);
    assert_eq!(state.players[0].snake.len(), 1);
    assert_eq!(state.players[0].vel, Point::ZERO);
  }

  #[test]
  fn multiplayer_state_has_two_players() {
    let state = GameState::new(false);
    assert_eq!(state.players.len(), 2);
    assert_eq!(
      state.players[0].head(),
      Point {
        x: PLAYER_ONE_START.0,
        y: PLAYER_ONE_START.1
      }
    );
    assert_eq!(
      state.players[1].head(),
      Point {
        x: PLAYER_TWO_START.0,
        y: PLAYER_TWO_START.1
      }
    );
  }

  #[test]
  fn initial_food_is_in_bounds_and_off_snakes() {
    for _ in 0..50 {
      let state = GameState::new(false);
      assert!(state.food.x >= 0 && state.food.x < state.grid_size);
      assert!(state.food.y >= 0 && state.food.y < state.grid_size);
      assert!(!state.occupied(state.food));
    }
  }

  #[test]
  fn random_free_cell_is_none_on_full_board() {
    let state = GameState {
      grid_size: 1,
      food: Point::ZERO,
      players: vec![PlayerState {
        snake: vec![Point::ZERO],
        vel: Point::ZERO,
      }],
      is_solo: true,
    };
    assert_eq!(state.random_free_cell(), None);
  }

  #[test]
  fn wire_format_uses_frontend_field_names() {
    let state = GameState::new(true);
    let value = serde_json::to_value(&state).expect("state should serialize");
    assert_eq!(value["gridsize"], GRID_SIZE);
    assert_eq!(value["isSolo"], true);
    assert!(value["food"]["x"].is_number());
    assert!(value["players"][0]["snake"].is_array());
  }
}
