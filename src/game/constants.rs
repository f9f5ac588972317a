pub const GRID_SIZE: i32 = 20;
pub const TICKS_PER_SECOND: u64 = 10;
pub const TICK_MS: u64 = 1000 / TICKS_PER_SECOND;
pub const MAX_PARTICIPANTS: usize = 2;
pub const IDLE_ROOM_TIMEOUT_MS: i64 = 300_000;
pub const GC_SWEEP_INTERVAL_SECS: u64 = 30;

pub const PLAYER_ONE_START: (i32, i32) = (5, 5);
pub const PLAYER_TWO_START: (i32, i32) = (14, 14);
