//! Ledgerfile Prelude
//!
//! Import this to get all commonly used types:
//!
//! ```
//! use ledgerfile::prelude::*;
//! ```

// Core types
pub use crate::{
    AccountRecord, ActivityEvent, DeviceBindingEvent, LogEntry, LoginEvent, LoginUpdate,
    ParseError, Result, StoreError, SystemMarker,
};

// Store and configuration
pub use crate::{RecordStore, StoreConfig};

// Log layer
pub use crate::{AppendWriter, LogScanner, LogStats};

// Re-export common external deps
pub use anyhow;
pub use serde::{Deserialize, Serialize};
pub use std::sync::Arc;
pub use tracing;
