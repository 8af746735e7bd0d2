use super::data::CachedData;

#[derive(Debug, Clone)]
pub struct CachedRecord {
    pub data: CachedData,
    /// Expiry as a Unix timestamp (seconds).
    pub expires_at_secs: u64,
    pub inserted_at_secs: u64,
    pub ttl: u32,
}

impl CachedRecord {
    pub fn new(data: CachedData, ttl: u32, now_secs: u64) -> Self {
        Self {
            data,
            expires_at_secs: now_secs + u64::from(ttl),
            inserted_at_secs: now_secs,
            ttl,
        }
    }

    #[inline(always)]
    pub fn is_expired_at_secs(&self, now_secs: u64) -> bool {
        now_secs >= self.expires_at_secs
    }

    pub fn remaining_ttl(&self, now_secs: u64) -> u32 {
        u32::try_from(self.expires_at_secs.saturating_sub(now_secs)).unwrap_or(u32::MAX)
    }

    pub fn age_secs(&self, now_secs: u64) -> u64 {
        now_secs.saturating_sub(self.inserted_at_secs)
    }
}
