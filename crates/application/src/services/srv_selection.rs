//! RFC 2782 weighted SRV selection.
//!
//! The pool is kept sorted by [`SrvCandidate::cmp`]. Selection only ever looks
//! at the current tier: the lowest priority present, restricted to the
//! transport of the first candidate at that priority so weights of different
//! transports are never mixed.

use sipdns_domain::Transport;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvCandidate {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub transport: Transport,
    /// Normalized host name to resolve.
    pub target: String,
}

impl Ord for SrvCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        (
            self.priority,
            self.weight,
            self.transport,
            &self.target,
            self.port,
        )
            .cmp(&(
                other.priority,
                other.weight,
                other.transport,
                &other.target,
                other.port,
            ))
    }
}

impl PartialOrd for SrvCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn in_tier(pool: &[SrvCandidate]) -> impl Fn(&SrvCandidate) -> bool {
    let head = pool.first().map(|c| (c.priority, c.transport));
    move |c| Some((c.priority, c.transport)) == head
}

/// Running weight totals of the current tier, as `(pool index, cumulative weight)`.
pub fn cumulative_weights(pool: &[SrvCandidate]) -> Vec<(usize, u32)> {
    let tier = in_tier(pool);
    let mut running = 0u32;
    pool.iter()
        .enumerate()
        .filter(|(_, c)| tier(*c))
        .map(|(idx, c)| {
            running += u32::from(c.weight);
            (idx, running)
        })
        .collect()
}

pub fn tier_weight(pool: &[SrvCandidate]) -> u32 {
    cumulative_weights(pool).last().map_or(0, |(_, w)| *w)
}

/// Index of the first tier member whose running total reaches `draw`.
///
/// `draw` is expected in `0..=tier_weight(pool)`; larger draws select the last
/// member of the tier. Returns `None` only for an empty pool.
pub fn pick(pool: &[SrvCandidate], draw: u32) -> Option<usize> {
    let cumulative = cumulative_weights(pool);
    cumulative
        .iter()
        .find(|(_, running)| *running >= draw)
        .or(cumulative.last())
        .map(|(idx, _)| *idx)
}

/// Removes and returns the next candidate to try.
pub fn take_next(pool: &mut Vec<SrvCandidate>, rng: &mut fastrand::Rng) -> Option<SrvCandidate> {
    let total = tier_weight(pool);
    let draw = rng.u32(0..=total);
    let idx = pick(pool, draw)?;
    Some(pool.remove(idx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn srv(priority: u16, weight: u16, transport: Transport, target: &str) -> SrvCandidate {
        SrvCandidate {
            priority,
            weight,
            port: 5060,
            transport,
            target: target.to_string(),
        }
    }

    #[test]
    fn test_cumulative_weights_stop_at_tier_boundary() {
        let mut pool = vec![
            srv(10, 20, Transport::Udp, "b"),
            srv(10, 10, Transport::Udp, "a"),
            srv(10, 5, Transport::Tcp, "c"),
            srv(20, 50, Transport::Udp, "d"),
        ];
        pool.sort();

        let cumulative = cumulative_weights(&pool);
        assert_eq!(cumulative.len(), 2);
        assert_eq!(cumulative.last().map(|c| c.1), Some(30));
    }

    #[test]
    fn test_pick_boundaries() {
        let pool = vec![srv(1, 0, Transport::Udp, "z"), srv(1, 10, Transport::Udp, "y")];
        assert_eq!(pick(&pool, 0), Some(0));
        assert_eq!(pick(&pool, 1), Some(1));
        assert_eq!(pick(&pool, 10), Some(1));
        assert_eq!(pick(&[], 0), None);
    }

    #[test]
    fn test_all_zero_weights_pick_first() {
        let pool = vec![srv(1, 0, Transport::Udp, "a"), srv(1, 0, Transport::Udp, "b")];
        assert_eq!(tier_weight(&pool), 0);
        assert_eq!(pick(&pool, 0), Some(0));
    }
}
