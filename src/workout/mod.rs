//! Async shell around the session core: one workout at a time, frames from a
//! live or recorded pose stream, durable per-frame log.

mod replay;
mod runner;

pub use replay::{replay_stream, ReplayStats, StreamEnd};
pub use runner::WorkoutRunner;
