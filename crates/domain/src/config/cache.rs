use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Floor applied to record TTLs before caching (seconds).
    #[serde(default)]
    pub min_ttl: u32,

    /// Ceiling applied to record TTLs before caching (seconds).
    #[serde(default = "default_max_ttl")]
    pub max_ttl: u32,

    /// TTL for NXDOMAIN/NODATA answers that carry no SOA.
    #[serde(default = "default_negative_ttl")]
    pub negative_ttl: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_max_entries(),
            min_ttl: 0,
            max_ttl: default_max_ttl(),
            negative_ttl: default_negative_ttl(),
        }
    }
}

impl CacheConfig {
    pub fn clamp_ttl(&self, ttl: u32) -> u32 {
        ttl.max(self.min_ttl).min(self.max_ttl)
    }
}

fn default_true() -> bool {
    true
}

fn default_max_entries() -> usize {
    10_000
}

fn default_max_ttl() -> u32 {
    86_400
}

fn default_negative_ttl() -> u32 {
    60
}
