//! The typed facade over the append writer and scan reader.

use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use ledgerfile_core::types::{
    AccountRecord, ActivityEvent, DeviceBindingEvent, LoginEvent, LoginUpdate, SystemMarker,
};
use ledgerfile_core::{LogEntry, Result, StoreConfig};
use ledgerfile_log::{AppendWriter, LogScanner, LogStats};

/// Single-file, append-only record store.
///
/// All writes are appended lines; all reads are full linear scans. There
/// is no index: current state of any entity is defined by a fold over the
/// file in line order. Queries are O(file size) on purpose; the facade is
/// the seam where an index or cache could later be slotted in without
/// changing the contract.
pub struct RecordStore {
    writer: AppendWriter,
    scanner: LogScanner,
}

impl RecordStore {
    /// Open the store, creating and initializing the log file if absent.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let writer = AppendWriter::open(&config)?;
        let scanner = LogScanner::new(&config.path);
        Ok(Self { writer, scanner })
    }

    /// Open at a path with default configuration.
    pub fn open_at(path: impl Into<std::path::PathBuf>) -> Result<Self> {
        Self::open(StoreConfig::new(path))
    }

    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    /// Create an account with a fresh unique id and append it.
    ///
    /// Email uniqueness is NOT checked here; callers pre-check with
    /// [`find_account_by_email`](Self::find_account_by_email) and treat a
    /// hit as [`StoreError::DuplicateAccount`](ledgerfile_core::StoreError).
    /// An I/O failure fails the whole operation; no partial account is
    /// ever persisted.
    pub fn create_account(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        ip_address: &str,
        device_id: &str,
    ) -> Result<AccountRecord> {
        let account = AccountRecord::create(name, email, password_hash, ip_address, device_id);
        self.writer.append(&LogEntry::Account(account.clone()))?;
        tracing::info!(account_id = %account.id, "account created");
        Ok(account)
    }

    /// First account whose email exactly equals the argument
    /// (case-sensitive), with later login updates folded in.
    pub fn find_account_by_email(&self, email: &str) -> Result<Option<AccountRecord>> {
        self.find_account(|account| account.email == email)
    }

    /// Same shape as [`find_account_by_email`](Self::find_account_by_email),
    /// keyed on id.
    pub fn find_account_by_id(&self, id: &str) -> Result<Option<AccountRecord>> {
        self.find_account(|account| account.id == id)
    }

    /// Single pass: take the first matching account line, then fold every
    /// later `LOGIN_UPDATE` for that account into `last_login_at` (last
    /// write wins).
    fn find_account<P>(&self, mut pred: P) -> Result<Option<AccountRecord>>
    where
        P: FnMut(&AccountRecord) -> bool,
    {
        let mut found: Option<AccountRecord> = None;
        for entry in self.scanner.scan()? {
            match entry? {
                LogEntry::Account(account) if found.is_none() && pred(&account) => {
                    found = Some(account);
                }
                LogEntry::LoginUpdate(update) => {
                    if let Some(account) = found.as_mut() {
                        if update.account_id == account.id {
                            account.last_login_at = update.last_login_at;
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(found)
    }

    /// Record a login: a `LOGIN_<n>` event plus a `LOGIN_UPDATE` overlay.
    ///
    /// The ordinal is `count_logins + 1`, computed by a scan before the
    /// append. That count-then-append sequence is deliberately not atomic:
    /// two concurrent logins for the same account can both read the same
    /// count and land with duplicate ordinals. File order stays
    /// authoritative, and this matches the store's documented contract.
    pub fn record_login(
        &self,
        account_id: &str,
        ip_address: &str,
        device_id: &str,
    ) -> Result<LoginEvent> {
        let ordinal = self.count_logins(account_id)? + 1;
        let event = LoginEvent {
            account_id: account_id.to_string(),
            ordinal,
            ip_address: ip_address.to_string(),
            device_id: device_id.to_string(),
            session_token: Uuid::new_v4().simple().to_string(),
            timestamp: Utc::now(),
        };

        self.writer.append(&LogEntry::Login(event.clone()))?;
        self.writer.append(&LogEntry::LoginUpdate(LoginUpdate {
            account_id: event.account_id.clone(),
            last_login_at: event.timestamp,
        }))?;

        tracing::info!(account_id, ordinal, "login recorded");
        Ok(event)
    }

    /// Number of `LOGIN_<n>` events for the account. Full scan.
    pub fn count_logins(&self, account_id: &str) -> Result<u64> {
        self.scanner
            .count(|entry| matches!(entry, LogEntry::Login(e) if e.account_id == account_id))
    }

    /// Append a `DEVICE_MEMORY` binding.
    pub fn record_device_binding(
        &self,
        account_id: &str,
        device_id: &str,
        remembered: bool,
    ) -> Result<()> {
        self.writer
            .append(&LogEntry::DeviceBinding(DeviceBindingEvent {
                account_id: account_id.to_string(),
                device_id: device_id.to_string(),
                remembered,
                timestamp: Utc::now(),
            }))
    }

    /// Append an `ACTIVITY` line, best effort.
    ///
    /// This is the one swallowing path in the store: telemetry is
    /// fire-and-forget, so failures (I/O or a rejected `details` value)
    /// are logged at `warn` and the caller sees nothing.
    pub fn append_activity(&self, account_id: &str, action: &str, details: &str) {
        let entry = LogEntry::Activity(ActivityEvent {
            account_id: account_id.to_string(),
            action: action.to_string(),
            details: details.to_string(),
            timestamp: Utc::now(),
        });
        if let Err(err) = self.writer.append(&entry) {
            tracing::warn!(account_id, action, error = %err, "activity append dropped");
        }
    }

    /// Append a `SYSTEM_READY` marker for the host application.
    pub fn mark_ready(&self, message: &str) -> Result<()> {
        self.writer
            .append(&LogEntry::System(SystemMarker::ready(message)))
    }

    /// The entire log file, verbatim. Administrative/debug surface; no
    /// pagination.
    pub fn dump_raw(&self) -> Result<String> {
        self.scanner.dump_raw()
    }

    /// Line/record/byte counters from one full pass.
    pub fn stats(&self) -> Result<LogStats> {
        self.scanner.stats()
    }

    /// Flush and fsync the log file.
    pub fn sync(&self) -> Result<()> {
        self.writer.sync()
    }

    /// Direct access to the scanner for ad hoc queries.
    pub fn scanner(&self) -> &LogScanner {
        &self.scanner
    }
}
