pub mod frame_record;
pub mod session;

pub use frame_record::FrameRecord;
pub use session::{Session, SessionStatus};
