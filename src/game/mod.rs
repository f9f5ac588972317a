pub mod constants;
pub mod engine;
pub mod input;
pub mod session;
pub mod types;
