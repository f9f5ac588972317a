pub mod codes;
pub mod time;
