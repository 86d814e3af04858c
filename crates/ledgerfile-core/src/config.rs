use std::path::PathBuf;

/// Configuration for the record log.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the single log file; parent directories are created on open.
    pub path: PathBuf,

    /// Buffer size for the append writer.
    pub write_buffer_size: usize,

    /// Whether to flush after each append (default: true).
    ///
    /// When `true`, every append flushes the `BufWriter`, so data reaches
    /// the OS page cache before the call returns and a scan from a fresh
    /// handle can observe it. Set to `false` for throughput at the cost of
    /// losing buffered lines on a process crash; the file itself is never
    /// corrupted either way, a crash mid-buffer just drops whole lines.
    pub flush_on_append: bool,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/users.txt"),
            write_buffer_size: 64 * 1024,
            flush_on_append: true,
        }
    }
}
