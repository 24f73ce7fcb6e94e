mod connection;
mod helpers;
mod migrations;
pub mod models;
mod repositories;

pub use connection::Database;
pub use models::{FrameRecord, Session, SessionStatus};

#[cfg(test)]
pub(crate) use connection::test_support;
