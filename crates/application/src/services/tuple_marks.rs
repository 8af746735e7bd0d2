use rustc_hash::FxHashMap;
use sipdns_domain::Tuple;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// How a resolution treats a candidate it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleMark {
    Ok,
    /// Handed out only after every unmarked candidate is exhausted.
    Grey,
    /// Never handed out.
    Black,
}

#[derive(Debug, Clone, Copy)]
struct MarkEntry {
    mark: TupleMark,
    expires_at: Instant,
}

/// Time-bounded grey/black marks on candidates, shared by every resolution
/// that should honour them. Expired marks are dropped on read.
#[derive(Debug, Default)]
pub struct TupleMarks {
    entries: Mutex<FxHashMap<Tuple, MarkEntry>>,
}

impl TupleMarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self, tuple: &Tuple, mark: TupleMark, expiry: Duration) {
        self.mark_until(tuple, mark, Instant::now() + expiry);
    }

    /// Marking `Ok` clears any existing mark.
    pub fn mark_until(&self, tuple: &Tuple, mark: TupleMark, expires_at: Instant) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        if mark == TupleMark::Ok {
            entries.remove(tuple);
            return;
        }
        debug!(tuple = %tuple, mark = ?mark, "Marking candidate");
        entries.insert(tuple.clone(), MarkEntry { mark, expires_at });
    }

    pub fn mark_of(&self, tuple: &Tuple) -> TupleMark {
        self.mark_of_at(tuple, Instant::now())
    }

    pub fn mark_of_at(&self, tuple: &Tuple, now: Instant) -> TupleMark {
        let Ok(mut entries) = self.entries.lock() else {
            return TupleMark::Ok;
        };
        match entries.get(tuple) {
            Some(entry) if entry.expires_at > now => entry.mark,
            Some(_) => {
                entries.remove(tuple);
                TupleMark::Ok
            }
            None => TupleMark::Ok,
        }
    }

    pub fn clear(&self, tuple: &Tuple) {
        self.mark_until(tuple, TupleMark::Ok, Instant::now());
    }

    /// Drops every mark that has expired by `now`; returns how many went.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let Ok(mut entries) = self.entries.lock() else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
