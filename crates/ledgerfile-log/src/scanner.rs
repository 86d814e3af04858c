use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use ledgerfile_core::{codec, LogEntry, ParseError, Result};

/// Streams the log file front-to-back and answers queries by linear scan.
///
/// Every call opens a fresh handle, so a scan observes whatever well-formed
/// prefix of the file has been flushed when it starts; reads are never
/// linearized with in-flight appends and take no lock. Lines that fail to
/// decode are logged and skipped, never fatal.
pub struct LogScanner {
    path: PathBuf,
}

impl LogScanner {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Iterate over all decodable entries in file order.
    pub fn scan(&self) -> Result<ScanIter> {
        let file = File::open(&self.path)?;
        Ok(ScanIter {
            reader: BufReader::new(file),
            buf: Vec::new(),
            line_no: 0,
            skipped: 0,
        })
    }

    /// First entry matching the predicate; short-circuits on a hit.
    pub fn find_first<P>(&self, mut pred: P) -> Result<Option<LogEntry>>
    where
        P: FnMut(&LogEntry) -> bool,
    {
        for entry in self.scan()? {
            let entry = entry?;
            if pred(&entry) {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// Last entry matching the predicate.
    ///
    /// Always reads the whole file: a match may appear anywhere later.
    pub fn find_last<P>(&self, mut pred: P) -> Result<Option<LogEntry>>
    where
        P: FnMut(&LogEntry) -> bool,
    {
        let mut last = None;
        for entry in self.scan()? {
            let entry = entry?;
            if pred(&entry) {
                last = Some(entry);
            }
        }
        Ok(last)
    }

    /// Number of entries matching the predicate. Full scan.
    pub fn count<P>(&self, mut pred: P) -> Result<u64>
    where
        P: FnMut(&LogEntry) -> bool,
    {
        let mut count = 0;
        for entry in self.scan()? {
            if pred(&entry?) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// The entire file, verbatim. Caller bears the cost of the full read.
    pub fn dump_raw(&self) -> Result<String> {
        Ok(std::fs::read_to_string(&self.path)?)
    }

    /// Counts over the whole file, including lines scans would skip.
    pub fn stats(&self) -> Result<LogStats> {
        let bytes = std::fs::metadata(&self.path)?.len();

        let mut iter = self.scan()?;
        let mut records = 0;
        let mut system_lines = 0;
        for entry in &mut iter {
            if entry?.is_system() {
                system_lines += 1;
            } else {
                records += 1;
            }
        }

        Ok(LogStats {
            lines: iter.line_no,
            records,
            system_lines,
            skipped: iter.skipped,
            bytes,
        })
    }
}

/// Counters describing one full pass over the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStats {
    /// Physical lines seen, decodable or not.
    pub lines: u64,

    /// Decoded record entries.
    pub records: u64,

    /// Decoded `SYSTEM_*` marker lines.
    pub system_lines: u64,

    /// Lines that failed to decode and were skipped.
    pub skipped: u64,

    /// File size in bytes at scan start.
    pub bytes: u64,
}

/// Iterator over decodable entries; finite, bounded by file length at open.
///
/// Not restartable: a fresh [`LogScanner::scan`] call re-reads from the
/// start. Malformed and non-UTF-8 lines increment [`ScanIter::skipped`]
/// and are logged at `debug`.
pub struct ScanIter {
    reader: BufReader<File>,
    buf: Vec<u8>,
    line_no: u64,
    skipped: u64,
}

impl ScanIter {
    /// Lines skipped so far because they failed to decode.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl Iterator for ScanIter {
    type Item = Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_no += 1;

            let decoded = match std::str::from_utf8(&self.buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => codec::decode_line(line),
                Err(_) => Err(ParseError::InvalidUtf8),
            };

            match decoded {
                Ok(entry) => return Some(Ok(entry)),
                Err(err) => {
                    tracing::debug!(line = self.line_no, error = %err, "skipping malformed line");
                    self.skipped += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppendWriter;
    use ledgerfile_core::types::DeviceBindingEvent;
    use ledgerfile_core::StoreConfig;
    use std::io::Write;
    use tempfile::TempDir;

    fn binding(account_id: &str, device_id: &str) -> LogEntry {
        LogEntry::DeviceBinding(DeviceBindingEvent {
            account_id: account_id.into(),
            device_id: device_id.into(),
            remembered: false,
            timestamp: chrono::Utc::now(),
        })
    }

    fn setup_with_bindings() -> (LogScanner, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig::new(temp_dir.path().join("users.txt"));
        let writer = AppendWriter::open(&config).unwrap();
        writer.append(&binding("acc-1", "dev-a")).unwrap();
        writer.append(&binding("acc-2", "dev-b")).unwrap();
        writer.append(&binding("acc-1", "dev-c")).unwrap();
        (LogScanner::new(&config.path), temp_dir)
    }

    fn is_for_account(entry: &LogEntry, account_id: &str) -> bool {
        matches!(entry, LogEntry::DeviceBinding(e) if e.account_id == account_id)
    }

    #[test]
    fn test_find_first_returns_oldest_match() {
        let (scanner, _temp) = setup_with_bindings();
        let found = scanner
            .find_first(|e| is_for_account(e, "acc-1"))
            .unwrap()
            .unwrap();
        match found {
            LogEntry::DeviceBinding(e) => assert_eq!(e.device_id, "dev-a"),
            other => panic!("expected device binding, got {other:?}"),
        }
    }

    #[test]
    fn test_find_last_returns_newest_match() {
        let (scanner, _temp) = setup_with_bindings();
        let found = scanner
            .find_last(|e| is_for_account(e, "acc-1"))
            .unwrap()
            .unwrap();
        match found {
            LogEntry::DeviceBinding(e) => assert_eq!(e.device_id, "dev-c"),
            other => panic!("expected device binding, got {other:?}"),
        }
    }

    #[test]
    fn test_count_matches() {
        let (scanner, _temp) = setup_with_bindings();
        assert_eq!(scanner.count(|e| is_for_account(e, "acc-1")).unwrap(), 2);
        assert_eq!(scanner.count(|e| is_for_account(e, "acc-3")).unwrap(), 0);
    }

    #[test]
    fn test_corrupted_trailing_line_is_skipped() {
        let (scanner, _temp) = setup_with_bindings();

        // Simulate a crash mid-append: a trailing line with a missing field
        // and no newline.
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(scanner.path())
            .unwrap();
        file.write_all(b"[2024-01-01T00:00:00Z] DEVICE_MEMORY: acc-9|dev")
            .unwrap();
        drop(file);

        let mut iter = scanner.scan().unwrap();
        let decoded: Vec<_> = iter.by_ref().map(|e| e.unwrap()).collect();
        // SYSTEM_INIT header + three bindings; the torn line is skipped.
        assert_eq!(decoded.len(), 4);
        assert_eq!(iter.skipped(), 1);
    }

    #[test]
    fn test_stats_counts_skipped_lines() {
        let (scanner, _temp) = setup_with_bindings();
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(scanner.path())
            .unwrap();
        file.write_all(b"garbage line\n\xff\xfe\n").unwrap();
        drop(file);

        let stats = scanner.stats().unwrap();
        assert_eq!(stats.records, 3);
        assert_eq!(stats.system_lines, 1);
        assert_eq!(stats.skipped, 2);
        assert!(stats.bytes > 0);
    }

    #[test]
    fn test_dump_raw_is_verbatim() {
        let (scanner, _temp) = setup_with_bindings();
        let raw = scanner.dump_raw().unwrap();
        assert_eq!(raw, std::fs::read_to_string(scanner.path()).unwrap());
        assert!(raw.contains("DEVICE_MEMORY"));
    }

    #[test]
    fn test_scan_on_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = LogScanner::new(temp_dir.path().join("missing.txt"));
        assert!(matches!(
            scanner.scan(),
            Err(ledgerfile_core::StoreError::Io(_))
        ));
    }
}
