pub mod event;
pub mod value;

pub use event::{Change, Event, EventType};
pub use value::{short_commit, Snapshot, Value, SOURCE_PREFIX_LEN};
