mod resolution;

pub use resolution::ResultState;

use crate::ports::{DnsHandler, QueryCallback, QueryDispatcher};
use crate::services::{NaptrCandidate, ResolverSettings, TupleMark, TupleMarks};
use resolution::{Capabilities, Effects, Question, Resolution};
use sipdns_domain::{RecordType, SipUri, Tuple};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::time::Duration;

struct Shared {
    resolution: RefCell<Resolution>,
    dispatcher: Rc<dyn QueryDispatcher>,
    handler: Rc<dyn DnsHandler>,
}

/// One outstanding resolution of a SIP URI into candidate [`Tuple`]s (RFC 3263).
///
/// # Threading
///
/// A `DnsResult` is `!Send`: it must be created, driven and destroyed on the
/// thread that runs its dispatcher's completions. Query callbacks share
/// ownership of the internal state, so destroying a result while queries are
/// in flight defers deallocation until the last callback has run or been
/// dropped; those late callbacks are ignored.
///
/// Dropping the owning handle has the same effect as [`DnsResult::destroy`].
pub struct DnsResult {
    shared: Rc<Shared>,
    owner: bool,
}

/// Non-owning probe used to observe when a destroyed result is released.
#[derive(Clone)]
pub struct WeakDnsResult {
    shared: Weak<Shared>,
}

impl WeakDnsResult {
    pub fn is_alive(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl DnsResult {
    pub fn new(
        dispatcher: Rc<dyn QueryDispatcher>,
        handler: Rc<dyn DnsHandler>,
        settings: ResolverSettings,
    ) -> Self {
        let caps = Capabilities {
            naptr: dispatcher.supports(RecordType::NAPTR),
            srv: dispatcher.supports(RecordType::SRV),
        };
        let resolution = Resolution::new(settings, caps, fastrand::Rng::new());
        Self {
            shared: Rc::new(Shared {
                resolution: RefCell::new(resolution),
                dispatcher,
                handler,
            }),
            owner: true,
        }
    }

    /// Makes weighted SRV selection deterministic.
    pub fn with_seed(self, seed: u64) -> Self {
        self.shared.resolution.borrow_mut().reseed(seed);
        self
    }

    /// Shares a mark store with other results; each result otherwise keeps its own.
    pub fn with_marks(self, marks: Arc<TupleMarks>) -> Self {
        self.shared.resolution.borrow_mut().set_marks(marks);
        self
    }

    pub fn lookup(&self, uri: &SipUri) {
        let effects = self.with_resolution(|r| r.lookup(uri));
        self.run(effects);
    }

    /// Current state; never `Available` while the queue is empty.
    pub fn available(&self) -> ResultState {
        loop {
            let mut state = ResultState::Pending;
            let effects = self.with_resolution(|r| state = r.available());
            if effects.is_empty() {
                return state;
            }
            // Dispatchers may complete synchronously, so re-read after issuing.
            self.run(effects);
        }
    }

    /// Pops the most preferred candidate.
    ///
    /// # Panics
    ///
    /// Panics unless `available()` returns `Available`.
    pub fn next(&self) -> Tuple {
        assert_eq!(
            self.available(),
            ResultState::Available,
            "DnsResult::next() called without an available result"
        );
        let mut tuple = None;
        let effects = self.with_resolution(|r| tuple = r.next());
        self.run(effects);
        match tuple {
            Some(tuple) => tuple,
            None => unreachable!("available() reported a non-empty queue"),
        }
    }

    /// Keeps the last candidate from `next()` out of every result sharing the
    /// mark store until `expiry` elapses. False if `next()` was never called.
    pub fn blacklist_last(&self, expiry: Duration) -> bool {
        self.shared
            .resolution
            .borrow_mut()
            .mark_last(TupleMark::Black, expiry)
    }

    /// Like [`DnsResult::blacklist_last`], but the candidate is still handed
    /// out once nothing unmarked remains.
    pub fn greylist_last(&self, expiry: Duration) -> bool {
        self.shared
            .resolution
            .borrow_mut()
            .mark_last(TupleMark::Grey, expiry)
    }

    pub fn destroy(self) {
        drop(self);
    }

    pub fn target(&self) -> Arc<str> {
        self.shared.resolution.borrow().target()
    }

    pub fn selected_naptr(&self) -> Option<NaptrCandidate> {
        self.shared.resolution.borrow().selected_naptr().cloned()
    }

    pub fn pending_queries(&self) -> usize {
        self.shared.resolution.borrow().pending_queries()
    }

    pub fn downgrade(&self) -> WeakDnsResult {
        WeakDnsResult {
            shared: Rc::downgrade(&self.shared),
        }
    }

    fn view(shared: Rc<Shared>) -> Self {
        Self {
            shared,
            owner: false,
        }
    }

    fn with_resolution(&self, f: impl FnOnce(&mut Resolution)) -> Effects {
        let mut resolution = self.shared.resolution.borrow_mut();
        f(&mut resolution);
        resolution.take_effects()
    }

    fn run(&self, effects: Effects) {
        for question in effects.queries {
            self.dispatch(question);
        }
        if effects.notify {
            let handler = Rc::clone(&self.shared.handler);
            handler.handle(self);
        }
    }

    fn dispatch(&self, question: Question) {
        let shared = Rc::clone(&self.shared);
        let id = question.id;
        let on_complete: QueryCallback = Box::new(move |result| {
            let result_view = DnsResult::view(shared);
            let effects = result_view.with_resolution(|r| r.on_answer(id, result));
            result_view.run(effects);
        });
        let dispatcher = Rc::clone(&self.shared.dispatcher);
        dispatcher.lookup(&question.name, question.record_type, on_complete);
    }
}

impl Drop for DnsResult {
    fn drop(&mut self) {
        if self.owner {
            self.shared.resolution.borrow_mut().destroy();
        }
    }
}
