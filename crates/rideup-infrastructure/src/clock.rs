//! Server-side timestamps for store writes.

use chrono::{SecondsFormat, Utc};

/// Current UTC time in the RFC 3339 form stores write for server timestamps.
pub fn server_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
