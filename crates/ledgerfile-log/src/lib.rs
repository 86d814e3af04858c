//! The physical log: one append-only text file.
//!
//! Two halves, deliberately kept apart:
//! - [`AppendWriter`]: serializes entries and appends them durably; the
//!   only component that ever writes the file.
//! - [`LogScanner`]: streams the file front-to-back and answers point and
//!   aggregate queries with a full linear scan; never writes, never locks.
//!
//! There is no index and no rotation. Every query is O(file size) by
//! design; current state is whatever a fold over the lines says it is.

mod scanner;
mod writer;

pub use scanner::{LogScanner, LogStats, ScanIter};
pub use writer::AppendWriter;
