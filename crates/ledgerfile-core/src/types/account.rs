use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user account as persisted in the log.
///
/// Written exactly once at registration and never rewritten in place.
/// Mutable state (`last_login_at`) is updated by later `LOGIN_UPDATE`
/// lines that readers fold over the original record, last write wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Globally unique, assigned at creation, never reused.
    pub id: String,

    pub name: String,

    /// Intended to be unique but not enforced by the store; callers
    /// pre-check with a lookup before creating.
    pub email: String,

    /// Already salted and hashed by the caller; opaque to the store.
    pub password_hash: String,

    /// IP address observed at registration.
    pub ip_address: String,

    /// Device fingerprint observed at registration.
    pub device_id: String,

    pub created_at: DateTime<Utc>,

    /// Equal to `created_at` until the first login.
    pub last_login_at: DateTime<Utc>,
}

impl AccountRecord {
    /// Build a fresh account with a generated id and current timestamps.
    pub fn create(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        ip_address: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            ip_address: ip_address.into(),
            device_id: device_id.into(),
            created_at: now,
            last_login_at: now,
        }
    }
}
