use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountRecord, ActivityEvent, DeviceBindingEvent, LoginEvent, LoginUpdate, MarkerKind, SystemMarker};

/// One decoded log line.
///
/// Every line in the file maps to exactly one variant; the codec in
/// [`crate::codec`] is the only place the wire grammar is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEntry {
    Account(AccountRecord),
    Login(LoginEvent),
    LoginUpdate(LoginUpdate),
    DeviceBinding(DeviceBindingEvent),
    Activity(ActivityEvent),
    System(SystemMarker),
}

impl LogEntry {
    /// The wire tag this entry is written under.
    pub fn tag(&self) -> String {
        match self {
            LogEntry::Account(_) => crate::codec::TAG_USER_DATA.to_string(),
            LogEntry::Login(e) => format!("{}{}", crate::codec::TAG_LOGIN_PREFIX, e.ordinal),
            LogEntry::LoginUpdate(_) => crate::codec::TAG_LOGIN_UPDATE.to_string(),
            LogEntry::DeviceBinding(_) => crate::codec::TAG_DEVICE_MEMORY.to_string(),
            LogEntry::Activity(_) => crate::codec::TAG_ACTIVITY.to_string(),
            LogEntry::System(m) => match m.kind {
                MarkerKind::Init => crate::codec::TAG_SYSTEM_INIT.to_string(),
                MarkerKind::Ready => crate::codec::TAG_SYSTEM_READY.to_string(),
            },
        }
    }

    /// Timestamp written as the line's bracketed prefix.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LogEntry::Account(a) => a.created_at,
            LogEntry::Login(e) => e.timestamp,
            LogEntry::LoginUpdate(u) => u.last_login_at,
            LogEntry::DeviceBinding(e) => e.timestamp,
            LogEntry::Activity(e) => e.timestamp,
            LogEntry::System(m) => m.timestamp,
        }
    }

    /// Whether this line is an informational marker rather than a record.
    pub fn is_system(&self) -> bool {
        matches!(self, LogEntry::System(_))
    }

    pub fn as_account(&self) -> Option<&AccountRecord> {
        match self {
            LogEntry::Account(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_login(&self) -> Option<&LoginEvent> {
        match self {
            LogEntry::Login(e) => Some(e),
            _ => None,
        }
    }
}
