use super::types::Point;

pub const KEY_LEFT: i32 = 37;
pub const KEY_UP: i32 = 38;
pub const KEY_RIGHT: i32 = 39;
pub const KEY_DOWN: i32 = 40;

/// Maps a directional key code to a unit movement vector. Any other
/// code has no mapping.
pub fn parse_direction(code: i32) -> Option<Point> {
    match code {
        KEY_LEFT => Some(Point { x: -1, y: 0 }),
        KEY_UP => Some(Point { x: 0, y: -1 }),
        KEY_RIGHT => Some(Point { x: 1, y: 0 }),
        KEY_DOWN => Some(Point { x: 0, y: 1 }),
        _ => None,
    }
}
