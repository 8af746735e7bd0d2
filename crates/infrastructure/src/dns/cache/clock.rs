use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix time in whole seconds; entries expire on second boundaries.
#[inline]
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
