//! Ledgerfile Core: types and codec for the ledgerfile record store
//!
//! This crate defines the shared vocabulary of the store:
//! - Record types: accounts, login events, device bindings, activity events
//! - The line codec: one record per newline-terminated, timestamped line
//! - Error taxonomy: I/O, per-line parse errors, encoding rejection
//! - Configuration for the log file
//!
//! No I/O happens here; the physical log lives in `ledgerfile-log` and the
//! typed facade in `ledgerfile`.

pub mod codec;
pub mod config;
pub mod error;
pub mod types;

pub use config::StoreConfig;
pub use error::{ParseError, Result, StoreError};
pub use types::{
    AccountRecord, ActivityEvent, DeviceBindingEvent, LogEntry, LoginEvent, LoginUpdate,
    MarkerKind, SystemMarker,
};
