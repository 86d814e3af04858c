//! Ledgerfile: a single-file, append-only, log-structured record store
//!
//! One newline-terminated, timestamped line per record; point lookups are
//! full linear scans with a predicate. The file doubles as write log,
//! audit trail, and database for a small set of record kinds: accounts,
//! login events, device bindings, and free-form activity.
//!
//! Trade-offs are deliberate: appends are durable and linearized, reads
//! need no locking because no partial line is ever visible, and every
//! query is O(file size). Simplicity over scale.
//!
//! # Quick Start
//!
//! ```no_run
//! use ledgerfile::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let store = RecordStore::open_at("./data/users.txt")?;
//!
//! // Callers enforce email uniqueness with a pre-check read.
//! if store.find_account_by_email("ann@x.com")?.is_some() {
//!     return Err(StoreError::DuplicateAccount("ann@x.com".into()));
//! }
//! let account = store.create_account("Ann", "ann@x.com", "h1", "1.2.3.4", "dev1")?;
//!
//! let login = store.record_login(&account.id, "1.2.3.4", "dev1")?;
//! assert_eq!(login.ordinal, 1);
//! store.append_activity(&account.id, "code_generated", "{\"lang\":\"python\"}");
//! # Ok(())
//! # }
//! ```

pub mod prelude;
mod store;

pub use store::RecordStore;

// Re-export core types
pub use ledgerfile_core::{
    codec, AccountRecord, ActivityEvent, DeviceBindingEvent, LogEntry, LoginEvent, LoginUpdate,
    MarkerKind, ParseError, Result, StoreConfig, StoreError, SystemMarker,
};

// Re-export the log layer
pub use ledgerfile_log::{AppendWriter, LogScanner, LogStats, ScanIter};
