//! Line codec: bidirectional mapping between a [`LogEntry`] and one log line.
//!
//! Wire grammar:
//!
//! ```text
//! <line> ::= "[" <RFC3339-timestamp> "] " <tag> ": " <field> ("|" <field>)* "\n"
//! ```
//!
//! Field order per tag is fixed and positional. Extra trailing fields are
//! ignored on decode (forward compatibility); too few fields fail that line
//! only. Decode is total: arbitrary input yields a [`LogEntry`] or a
//! [`ParseError`], never a panic, so a corrupted or truncated line cannot
//! abort a scan of the lines around it.
//!
//! Encode rejects field values containing `|`, `\n`, or `\r` with
//! [`StoreError::Encoding`] before anything reaches the file. Escaping was
//! considered and rejected: the grammar stays trivially greppable and the
//! reserved bytes never appear in the values this store is fed.

use chrono::{DateTime, Utc};

use crate::error::{ParseError, Result, StoreError};
use crate::types::{
    AccountRecord, ActivityEvent, DeviceBindingEvent, LogEntry, LoginEvent, LoginUpdate,
    SystemMarker,
};

pub const TAG_USER_DATA: &str = "USER_DATA";
/// Legacy alias for [`TAG_USER_DATA`]; accepted on decode, never written.
pub const TAG_REGISTRATION: &str = "REGISTRATION";
pub const TAG_LOGIN_UPDATE: &str = "LOGIN_UPDATE";
pub const TAG_LOGIN_PREFIX: &str = "LOGIN_";
pub const TAG_DEVICE_MEMORY: &str = "DEVICE_MEMORY";
pub const TAG_ACTIVITY: &str = "ACTIVITY";
pub const TAG_SYSTEM_INIT: &str = "SYSTEM_INIT";
pub const TAG_SYSTEM_READY: &str = "SYSTEM_READY";

/// Encode one entry as a full line, trailing newline included.
pub fn encode_line(entry: &LogEntry) -> Result<String> {
    let fields = match entry {
        LogEntry::Account(a) => vec![
            a.id.clone(),
            a.name.clone(),
            a.email.clone(),
            a.password_hash.clone(),
            a.ip_address.clone(),
            a.device_id.clone(),
            a.created_at.to_rfc3339(),
            a.last_login_at.to_rfc3339(),
        ],
        LogEntry::Login(e) => vec![
            e.account_id.clone(),
            e.ip_address.clone(),
            e.device_id.clone(),
            e.session_token.clone(),
        ],
        LogEntry::LoginUpdate(u) => {
            vec![u.account_id.clone(), u.last_login_at.to_rfc3339()]
        }
        LogEntry::DeviceBinding(e) => vec![
            e.account_id.clone(),
            e.device_id.clone(),
            e.remembered.to_string(),
        ],
        LogEntry::Activity(e) => {
            vec![e.account_id.clone(), e.action.clone(), e.details.clone()]
        }
        LogEntry::System(m) => vec![m.message.clone()],
    };

    for field in &fields {
        check_field(field)?;
    }

    Ok(format!(
        "[{}] {}: {}\n",
        entry.timestamp().to_rfc3339(),
        entry.tag(),
        fields.join("|")
    ))
}

/// Reject values that would corrupt the line grammar.
fn check_field(value: &str) -> Result<()> {
    if value.contains('|') || value.contains('\n') || value.contains('\r') {
        return Err(StoreError::Encoding(format!(
            "field value contains reserved delimiter bytes: {value:?}"
        )));
    }
    Ok(())
}

/// Decode one line (with or without its trailing newline).
pub fn decode_line(line: &str) -> std::result::Result<LogEntry, ParseError> {
    let line = line.trim_end_matches(['\n', '\r']);

    let rest = line.strip_prefix('[').ok_or(ParseError::MissingTimestamp)?;
    let (ts_str, rest) = rest.split_once("] ").ok_or(ParseError::MissingTimestamp)?;
    let timestamp = parse_timestamp(ts_str)?;

    let (tag, payload) = rest.split_once(": ").ok_or(ParseError::MissingTag)?;
    let fields: Vec<&str> = payload.split('|').collect();

    match tag {
        TAG_USER_DATA | TAG_REGISTRATION => decode_account(tag, &fields),
        TAG_LOGIN_UPDATE => decode_login_update(&fields),
        TAG_DEVICE_MEMORY => decode_device_binding(&fields, timestamp),
        TAG_ACTIVITY => decode_activity(&fields, timestamp),
        TAG_SYSTEM_INIT => Ok(LogEntry::System(SystemMarker {
            kind: crate::types::MarkerKind::Init,
            message: payload.to_string(),
            timestamp,
        })),
        TAG_SYSTEM_READY => Ok(LogEntry::System(SystemMarker {
            kind: crate::types::MarkerKind::Ready,
            message: payload.to_string(),
            timestamp,
        })),
        other => match other.strip_prefix(TAG_LOGIN_PREFIX) {
            Some(ord) => decode_login(other, ord, &fields, timestamp),
            None => Err(ParseError::UnknownTag(other.to_string())),
        },
    }
}

fn parse_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ParseError::BadTimestamp(value.to_string()))
}

fn require_fields(
    tag: &str,
    fields: &[&str],
    expected: usize,
) -> std::result::Result<(), ParseError> {
    if fields.len() < expected {
        return Err(ParseError::FieldCount {
            tag: tag.to_string(),
            expected,
            got: fields.len(),
        });
    }
    Ok(())
}

fn decode_account(tag: &str, fields: &[&str]) -> std::result::Result<LogEntry, ParseError> {
    require_fields(tag, fields, 8)?;
    Ok(LogEntry::Account(AccountRecord {
        id: fields[0].to_string(),
        name: fields[1].to_string(),
        email: fields[2].to_string(),
        password_hash: fields[3].to_string(),
        ip_address: fields[4].to_string(),
        device_id: fields[5].to_string(),
        created_at: parse_timestamp(fields[6])
            .map_err(|_| ParseError::InvalidField {
                field: "created_at",
                value: fields[6].to_string(),
            })?,
        last_login_at: parse_timestamp(fields[7])
            .map_err(|_| ParseError::InvalidField {
                field: "last_login_at",
                value: fields[7].to_string(),
            })?,
    }))
}

fn decode_login(
    tag: &str,
    ordinal: &str,
    fields: &[&str],
    timestamp: DateTime<Utc>,
) -> std::result::Result<LogEntry, ParseError> {
    let ordinal: u64 = ordinal.parse().map_err(|_| ParseError::InvalidField {
        field: "ordinal",
        value: ordinal.to_string(),
    })?;
    require_fields(tag, fields, 4)?;
    Ok(LogEntry::Login(LoginEvent {
        account_id: fields[0].to_string(),
        ordinal,
        ip_address: fields[1].to_string(),
        device_id: fields[2].to_string(),
        session_token: fields[3].to_string(),
        timestamp,
    }))
}

fn decode_login_update(fields: &[&str]) -> std::result::Result<LogEntry, ParseError> {
    require_fields(TAG_LOGIN_UPDATE, fields, 2)?;
    Ok(LogEntry::LoginUpdate(LoginUpdate {
        account_id: fields[0].to_string(),
        last_login_at: parse_timestamp(fields[1])
            .map_err(|_| ParseError::InvalidField {
                field: "last_login_at",
                value: fields[1].to_string(),
            })?,
    }))
}

fn decode_device_binding(
    fields: &[&str],
    timestamp: DateTime<Utc>,
) -> std::result::Result<LogEntry, ParseError> {
    require_fields(TAG_DEVICE_MEMORY, fields, 3)?;
    let remembered = match fields[2] {
        "true" => true,
        "false" => false,
        other => {
            return Err(ParseError::InvalidField {
                field: "remembered",
                value: other.to_string(),
            })
        }
    };
    Ok(LogEntry::DeviceBinding(DeviceBindingEvent {
        account_id: fields[0].to_string(),
        device_id: fields[1].to_string(),
        remembered,
        timestamp,
    }))
}

fn decode_activity(
    fields: &[&str],
    timestamp: DateTime<Utc>,
) -> std::result::Result<LogEntry, ParseError> {
    require_fields(TAG_ACTIVITY, fields, 3)?;
    Ok(LogEntry::Activity(ActivityEvent {
        account_id: fields[0].to_string(),
        action: fields[1].to_string(),
        details: fields[2].to_string(),
        timestamp,
    }))
}
