use sipdns_domain::{NaptrData, Transport};
use std::cmp::Ordering;

/// A usable NAPTR record reduced to what RFC 3263 selection looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaptrCandidate {
    pub order: u16,
    pub preference: u16,
    /// Normalized SRV name the record points at.
    pub replacement: String,
    pub transport: Transport,
}

impl NaptrCandidate {
    /// Accepts a record only if it names a SIP service we can use.
    ///
    /// Secure lookups only consider `SIPS+` services. Records with a terminal
    /// flag other than `s`, or without a replacement, are not SRV pointers.
    pub fn from_record(
        data: &NaptrData,
        sips: bool,
        supports: impl Fn(Transport) -> bool,
    ) -> Option<Self> {
        if sips && !data.service.to_ascii_uppercase().starts_with("SIPS+") {
            return None;
        }
        if !data.flags.is_empty() && !data.flags.eq_ignore_ascii_case("s") {
            return None;
        }
        if sipdns_domain::is_root_name(&data.replacement) {
            return None;
        }
        let transport = Transport::from_naptr_service(&data.service)?;
        if !supports(transport) {
            return None;
        }
        Some(Self {
            order: data.order,
            preference: data.preference,
            replacement: sipdns_domain::normalize_name(&data.replacement),
            transport,
        })
    }

    fn sort_key(&self) -> (u16, u16, &str, Transport) {
        (
            self.order,
            self.preference,
            self.replacement.as_str(),
            self.transport,
        )
    }
}

// Lower order wins, then lower preference, then the lexically smaller replacement.
impl Ord for NaptrCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for NaptrCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub fn select_best<I>(candidates: I) -> Option<NaptrCandidate>
where
    I: IntoIterator<Item = NaptrCandidate>,
{
    candidates.into_iter().min()
}
