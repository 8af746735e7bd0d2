use sipdns_application::ports::{DnsHandler, QueryCallback, QueryDispatcher, QueryResult};
use sipdns_application::services::ResolverSettings;
use sipdns_application::use_cases::DnsResult;
use sipdns_domain::{normalize_name, DnsAnswer, RecordType, Transport};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

struct PendingQuery {
    name: String,
    record_type: RecordType,
    on_complete: QueryCallback,
}

/// Test double that records every query and holds callbacks until the test answers them.
///
/// In immediate mode, scripted answers are delivered from inside the lookup
/// call, like a cache hit would be.
pub struct MockDispatcher {
    issued: RefCell<Vec<(String, RecordType)>>,
    pending: RefCell<VecDeque<PendingQuery>>,
    scripted: RefCell<HashMap<(String, RecordType), QueryResult>>,
    unsupported: Vec<RecordType>,
    immediate: bool,
}

impl MockDispatcher {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::build(vec![], false))
    }

    pub fn immediate() -> Rc<Self> {
        Rc::new(Self::build(vec![], true))
    }

    /// Backend that can only answer address queries.
    pub fn address_only() -> Rc<Self> {
        Rc::new(Self::build(vec![RecordType::NAPTR, RecordType::SRV], false))
    }

    fn build(unsupported: Vec<RecordType>, immediate: bool) -> Self {
        Self {
            issued: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
            scripted: RefCell::new(HashMap::new()),
            unsupported,
            immediate,
        }
    }

    pub fn set_response(&self, name: &str, record_type: RecordType, result: QueryResult) {
        self.scripted
            .borrow_mut()
            .insert((normalize_name(name), record_type), result);
    }

    pub fn issued(&self) -> Vec<(String, RecordType)> {
        self.issued.borrow().clone()
    }

    pub fn issued_of(&self, record_type: RecordType) -> Vec<String> {
        self.issued
            .borrow()
            .iter()
            .filter(|(_, rt)| *rt == record_type)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Answers the oldest pending query for `name`/`record_type`.
    pub fn respond(&self, name: &str, record_type: RecordType, result: QueryResult) {
        let name = normalize_name(name);
        let query = {
            let mut pending = self.pending.borrow_mut();
            let idx = pending
                .iter()
                .position(|q| q.name == name && q.record_type == record_type)
                .unwrap_or_else(|| panic!("no pending {} query for {}", record_type, name));
            pending.remove(idx).unwrap()
        };
        (query.on_complete)(result);
    }

    /// Answers pending queries from the script (empty answer when unscripted) until none remain.
    pub fn run_until_idle(&self) {
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(query) = next else { break };
            let result = self.scripted_result(&query.name, query.record_type);
            (query.on_complete)(result);
        }
    }

    /// Discards pending callbacks without invoking them.
    pub fn drop_pending(&self) {
        self.pending.borrow_mut().clear();
    }

    fn scripted_result(&self, name: &str, record_type: RecordType) -> QueryResult {
        self.scripted
            .borrow()
            .get(&(name.to_string(), record_type))
            .cloned()
            .unwrap_or_else(|| Ok(DnsAnswer::default()))
    }

    fn record(&self, name: &str, record_type: RecordType, on_complete: QueryCallback) {
        let name = normalize_name(name);
        self.issued.borrow_mut().push((name.clone(), record_type));
        if self.immediate {
            let result = self.scripted_result(&name, record_type);
            on_complete(result);
        } else {
            self.pending.borrow_mut().push_back(PendingQuery {
                name,
                record_type,
                on_complete,
            });
        }
    }
}

impl QueryDispatcher for MockDispatcher {
    fn lookup_naptr(&self, name: &str, on_complete: QueryCallback) {
        self.record(name, RecordType::NAPTR, on_complete);
    }

    fn lookup_srv(&self, name: &str, on_complete: QueryCallback) {
        self.record(name, RecordType::SRV, on_complete);
    }

    fn lookup_a_records(&self, name: &str, on_complete: QueryCallback) {
        self.record(name, RecordType::A, on_complete);
    }

    fn lookup_aaaa_records(&self, name: &str, on_complete: QueryCallback) {
        self.record(name, RecordType::AAAA, on_complete);
    }

    fn supports(&self, record_type: RecordType) -> bool {
        !self.unsupported.contains(&record_type)
    }
}

/// Counts notifications; never touches the result it is handed.
#[derive(Default)]
pub struct RecordingHandler {
    notifications: Cell<usize>,
}

impl RecordingHandler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.notifications.get()
    }
}

impl DnsHandler for RecordingHandler {
    fn handle(&self, _result: &DnsResult) {
        self.notifications.set(self.notifications.get() + 1);
    }
}

/// UDP and TCP over IPv4 only, so every host lookup is a single A query.
pub fn udp_tcp_v4() -> ResolverSettings {
    ResolverSettings::empty()
        .with_transport(Transport::Udp, true, false)
        .with_transport(Transport::Tcp, true, false)
}

pub fn with_tls_v4(settings: ResolverSettings) -> ResolverSettings {
    settings.with_transport(Transport::Tls, true, false)
}

pub fn new_result(
    dispatcher: &Rc<MockDispatcher>,
    handler: &Rc<RecordingHandler>,
    settings: ResolverSettings,
) -> DnsResult {
    DnsResult::new(dispatcher.clone(), handler.clone(), settings).with_seed(7)
}

/// Drains every candidate, answering queries from the script as the resolver issues them.
pub fn drain(result: &DnsResult, dispatcher: &MockDispatcher) -> Vec<sipdns_domain::Tuple> {
    use sipdns_application::use_cases::ResultState;

    let mut out = Vec::new();
    loop {
        match result.available() {
            ResultState::Available => out.push(result.next()),
            ResultState::Pending => {
                assert!(
                    dispatcher.pending_count() > 0,
                    "resolver is pending without outstanding queries"
                );
                dispatcher.run_until_idle();
            }
            ResultState::Finished => return out,
        }
    }
}
