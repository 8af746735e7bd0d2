use compact_str::CompactString;
use sipdns_domain::{normalize_name, RecordType};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub name: CompactString,
    pub record_type: RecordType,
}

impl CacheKey {
    /// Key for `name` in canonical form, so `Example.COM.` and `example.com` share an entry.
    #[inline]
    pub fn new(name: &str, record_type: RecordType) -> Self {
        Self {
            name: CompactString::from(normalize_name(name)),
            record_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_canonicalized() {
        assert_eq!(
            CacheKey::new("SIP.Example.com.", RecordType::A),
            CacheKey::new("sip.example.com", RecordType::A)
        );
        assert_ne!(
            CacheKey::new("sip.example.com", RecordType::A),
            CacheKey::new("sip.example.com", RecordType::AAAA)
        );
    }
}
