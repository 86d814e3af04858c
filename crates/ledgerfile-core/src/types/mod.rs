mod account;
mod entry;
mod event;

pub use account::AccountRecord;
pub use entry::LogEntry;
pub use event::{ActivityEvent, DeviceBindingEvent, LoginEvent, LoginUpdate, MarkerKind, SystemMarker};
