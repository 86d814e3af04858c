use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One login, persisted as a `LOGIN_<n>` line.
///
/// `ordinal` is derived at write time by counting prior logins for the
/// same account. The count-then-append sequence is not atomic, so two
/// concurrent logins can observe the same count and land with duplicate
/// ordinals; insertion order in the file remains the authoritative order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginEvent {
    pub account_id: String,

    /// 1-based sequence number for this account, carried in the tag.
    pub ordinal: u64,

    pub ip_address: String,
    pub device_id: String,
    pub session_token: String,
    pub timestamp: DateTime<Utc>,
}

/// Overlay updating an account's `last_login_at`, persisted as a
/// `LOGIN_UPDATE` line. Readers fold the newest one over the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginUpdate {
    pub account_id: String,
    pub last_login_at: DateTime<Utc>,
}

/// Device fingerprint bound to an account, persisted as `DEVICE_MEMORY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceBindingEvent {
    pub account_id: String,
    pub device_id: String,

    /// Whether the user asked to be remembered on this device.
    pub remembered: bool,

    pub timestamp: DateTime<Utc>,
}

/// Free-form activity record, persisted as `ACTIVITY`.
///
/// Best-effort telemetry: the store swallows append failures for these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub account_id: String,
    pub action: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

/// Informational marker line (`SYSTEM_INIT` / `SYSTEM_READY`).
///
/// Not a record: scans surface these but queries ignore them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemMarker {
    pub kind: MarkerKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    /// Written once when the log file is first created.
    Init,
    /// Written when the host application reports itself up.
    Ready,
}

impl SystemMarker {
    pub fn init(message: impl Into<String>) -> Self {
        Self {
            kind: MarkerKind::Init,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn ready(message: impl Into<String>) -> Self {
        Self {
            kind: MarkerKind::Ready,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
