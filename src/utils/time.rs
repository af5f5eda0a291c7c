//! Time Helpers

use chrono::Utc;

/// Current timestamp in milliseconds since epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
