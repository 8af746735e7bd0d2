//! Sans-IO core of a single RFC 3263 server location.
//!
//! Every entry point mutates the state and queues [`Effects`]; the owning
//! [`super::DnsResult`] performs them once its borrow is released.

use crate::ports::QueryResult;
use crate::services::naptr_selection::{self, NaptrCandidate};
use crate::services::srv_selection::{self, SrvCandidate};
use crate::services::{ResolverSettings, TupleMark, TupleMarks};
use rustc_hash::FxHashMap;
use sipdns_domain::{
    is_root_name, normalize_name, DnsAnswer, IpFamily, RecordData, RecordType, ResourceRecord,
    SipUri, SrvData, Transport, Tuple,
};
use std::collections::VecDeque;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub(crate) type QueryId = u64;

/// What callers can observe through `available()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultState {
    Available,
    Pending,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Pending,
    Available,
    Finished,
    Destroyed,
}

#[derive(Debug)]
pub(crate) struct Question {
    pub id: QueryId,
    pub name: String,
    pub record_type: RecordType,
}

#[derive(Debug, Default)]
pub(crate) struct Effects {
    pub queries: Vec<Question>,
    pub notify: bool,
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty() && !self.notify
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Capabilities {
    pub naptr: bool,
    pub srv: bool,
}

#[derive(Debug, Clone, Copy)]
enum Outstanding {
    Naptr,
    Srv(Transport),
    Host(RecordType),
}

#[derive(Debug)]
struct HostLookup {
    name: String,
    then_a: bool,
}

pub(crate) struct Resolution {
    settings: ResolverSettings,
    caps: Capabilities,
    phase: Phase,
    started: bool,
    sips: bool,
    target: Arc<str>,
    transport: Option<Transport>,
    port: u16,
    transport_pinned: bool,
    results: VecDeque<Tuple>,
    greylisted: Vec<Tuple>,
    last_returned: Option<Tuple>,
    marks: Arc<TupleMarks>,
    srv_pool: Vec<SrvCandidate>,
    naptr: Option<NaptrCandidate>,
    pending_srv: usize,
    host: Option<HostLookup>,
    outstanding: FxHashMap<QueryId, Outstanding>,
    next_query_id: QueryId,
    glue_a: FxHashMap<String, Vec<IpAddr>>,
    glue_aaaa: FxHashMap<String, Vec<IpAddr>>,
    cname_redirects: u8,
    rng: fastrand::Rng,
    effects: Effects,
}

impl Resolution {
    pub fn new(settings: ResolverSettings, caps: Capabilities, rng: fastrand::Rng) -> Self {
        Self {
            settings,
            caps,
            phase: Phase::Pending,
            started: false,
            sips: false,
            target: Arc::from(""),
            transport: None,
            port: 0,
            transport_pinned: false,
            results: VecDeque::new(),
            greylisted: Vec::new(),
            last_returned: None,
            marks: Arc::new(TupleMarks::new()),
            srv_pool: Vec::new(),
            naptr: None,
            pending_srv: 0,
            host: None,
            outstanding: FxHashMap::default(),
            next_query_id: 1,
            glue_a: FxHashMap::default(),
            glue_aaaa: FxHashMap::default(),
            cname_redirects: 0,
            rng,
            effects: Effects::default(),
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = fastrand::Rng::with_seed(seed);
    }

    pub fn set_marks(&mut self, marks: Arc<TupleMarks>) {
        self.marks = marks;
    }

    pub fn take_effects(&mut self) -> Effects {
        std::mem::take(&mut self.effects)
    }

    pub fn target(&self) -> Arc<str> {
        Arc::clone(&self.target)
    }

    pub fn selected_naptr(&self) -> Option<&NaptrCandidate> {
        self.naptr.as_ref()
    }

    pub fn pending_queries(&self) -> usize {
        self.outstanding.len()
    }

    fn transition(&mut self, next: Phase) {
        debug_assert!(
            !(matches!(self.phase, Phase::Finished | Phase::Destroyed)
                && matches!(next, Phase::Pending | Phase::Available)),
            "illegal transition {:?} -> {:?}",
            self.phase,
            next
        );
        if self.phase == Phase::Pending && matches!(next, Phase::Available | Phase::Finished) {
            self.effects.notify = true;
        }
        self.phase = next;
    }

    fn issue(&mut self, name: String, record_type: RecordType, kind: Outstanding) {
        let id = self.next_query_id;
        self.next_query_id += 1;
        debug!(target_name = %name, record_type = %record_type, query_id = id, "Issuing DNS query");
        self.outstanding.insert(id, kind);
        self.effects.queries.push(Question {
            id,
            name,
            record_type,
        });
    }

    // ── entry point ────────────────────────────────────────────────────────

    pub fn lookup(&mut self, uri: &SipUri) {
        assert!(!self.started, "lookup() called twice on the same DnsResult");
        self.started = true;
        self.sips = uri.is_secure();

        let target = uri.resolution_target();
        let literal = target.parse::<IpAddr>().ok();
        self.target = Arc::from(normalize_name(&target).as_str());

        debug!(uri = %uri, domain = %self.target, "Starting SIP server lookup");

        match (uri.transport, literal, uri.port) {
            (Some(requested), Some(ip), port) => {
                self.pin(requested, port.unwrap_or(requested.default_port(self.sips)));
                self.push_literal(ip);
            }
            (Some(requested), None, Some(port)) => {
                if !self.settings.supports_transport(requested) {
                    return self.unsupported(requested);
                }
                self.pin(requested, port);
                self.lookup_host(self.target.to_string());
            }
            (Some(requested), None, None) => {
                let transport = match (self.sips, requested) {
                    (true, Transport::Udp | Transport::Dtls) => Transport::Dtls,
                    (true, _) => Transport::Tls,
                    (false, t) => t,
                };
                if !self.settings.supports_transport(transport) {
                    return self.unsupported(transport);
                }
                self.pin(transport, 0);
                if self.caps.srv {
                    let name = transport.srv_name(&self.target);
                    self.issue_srv(name, transport);
                } else {
                    self.port = transport.default_port(self.sips);
                    self.lookup_host(self.target.to_string());
                }
            }
            (None, Some(ip), port) => {
                let transport = if self.sips {
                    Transport::Tls
                } else {
                    self.settings
                        .default_plain_transport()
                        .unwrap_or(Transport::Udp)
                };
                self.pin(transport, port.unwrap_or(transport.default_port(self.sips)));
                self.push_literal(ip);
            }
            (None, None, Some(port)) => {
                let transport = if self.sips {
                    Some(Transport::Tls)
                } else {
                    self.settings.default_plain_transport()
                };
                match transport {
                    Some(transport) => {
                        self.pin(transport, port);
                        self.lookup_host(self.target.to_string());
                    }
                    None => self.transition(Phase::Finished),
                }
            }
            (None, None, None) => {
                if self.caps.naptr {
                    self.issue(self.target.to_string(), RecordType::NAPTR, Outstanding::Naptr);
                } else {
                    self.naptr_failed();
                }
            }
        }
    }

    fn pin(&mut self, transport: Transport, port: u16) {
        self.transport = Some(transport);
        self.transport_pinned = true;
        self.port = port;
    }

    fn unsupported(&mut self, transport: Transport) {
        debug!(domain = %self.target, transport = %transport, "Requested transport is not supported locally");
        self.transition(Phase::Finished);
    }

    fn push_literal(&mut self, ip: IpAddr) {
        if let Some(transport) = self.transport {
            let tuple = Tuple::new(ip, self.port, transport, Arc::clone(&self.target));
            // The only candidate there will be, so a grey mark does not defer it.
            if self.marks.mark_of(&tuple) == TupleMark::Black {
                debug!(tuple = %tuple, "Literal address is blacklisted");
            } else {
                self.results.push_back(tuple);
            }
        }
        self.transition(Phase::Available);
    }

    /// Queues a candidate according to its current mark.
    fn accept(&mut self, tuple: Tuple) {
        match self.marks.mark_of(&tuple) {
            TupleMark::Ok => self.results.push_back(tuple),
            TupleMark::Grey => {
                debug!(tuple = %tuple, "Deferring greylisted candidate");
                self.greylisted.push(tuple);
            }
            TupleMark::Black => debug!(tuple = %tuple, "Skipping blacklisted candidate"),
        }
    }

    /// Nothing unmarked is left: release the greylisted candidates or finish.
    fn exhausted(&mut self) {
        if self.greylisted.is_empty() {
            self.transition(Phase::Finished);
        } else {
            self.results.extend(self.greylisted.drain(..));
            self.transition(Phase::Available);
        }
    }

    // ── caller-facing queue ────────────────────────────────────────────────

    pub fn available(&mut self) -> ResultState {
        loop {
            match self.phase {
                Phase::Available if !self.results.is_empty() => return ResultState::Available,
                Phase::Available => self.prime(),
                Phase::Pending => return ResultState::Pending,
                Phase::Finished | Phase::Destroyed => return ResultState::Finished,
            }
        }
    }

    pub fn next(&mut self) -> Option<Tuple> {
        let tuple = self.results.pop_front();
        if tuple.is_some() {
            self.last_returned = tuple.clone();
        }
        tuple
    }

    /// Marks the candidate most recently returned by `next()` for `expiry`.
    /// Returns false when nothing has been returned yet.
    pub fn mark_last(&mut self, mark: TupleMark, expiry: Duration) -> bool {
        match &self.last_returned {
            Some(tuple) => {
                self.marks.mark(tuple, mark, expiry);
                true
            }
            None => false,
        }
    }

    pub fn destroy(&mut self) {
        self.phase = if self.outstanding.is_empty() && self.phase != Phase::Pending {
            Phase::Finished
        } else {
            Phase::Destroyed
        };
        self.results.clear();
        self.greylisted.clear();
        self.srv_pool.clear();
        self.effects = Effects::default();
    }

    // ── completions ────────────────────────────────────────────────────────

    pub fn on_answer(&mut self, id: QueryId, result: QueryResult) {
        let Some(kind) = self.outstanding.remove(&id) else {
            warn!(query_id = id, "Ignoring completion for unknown query");
            return;
        };
        if self.phase == Phase::Destroyed {
            debug!(query_id = id, remaining = self.outstanding.len(), "Dropping completion after destroy");
            return;
        }
        match kind {
            Outstanding::Naptr => self.on_naptr(result),
            Outstanding::Srv(transport) => self.on_srv(transport, result),
            Outstanding::Host(record_type) => self.on_host(record_type, result),
        }
    }

    fn on_naptr(&mut self, result: QueryResult) {
        let answer = match result {
            Ok(answer) => answer,
            Err(e) => {
                debug!(domain = %self.target, error = %e, "NAPTR lookup failed");
                return self.naptr_failed();
            }
        };

        self.absorb_glue(&answer.additional);

        let sips = self.sips;
        let settings = &self.settings;
        let best = naptr_selection::select_best(answer.naptr_records().filter_map(|(_, n)| {
            NaptrCandidate::from_record(n, sips, |t| settings.supports_transport(t))
        }));

        match best {
            Some(best) => self.follow_naptr(best, &answer),
            None => {
                if answer.naptr_records().next().is_none() {
                    if let Some(canonical) = answer.cname() {
                        if self.cname_redirects < self.settings.max_cname_redirects {
                            self.cname_redirects += 1;
                            debug!(domain = %self.target, canonical = %canonical, "Following CNAME for NAPTR");
                            let canonical = canonical.to_string();
                            return self.issue(canonical, RecordType::NAPTR, Outstanding::Naptr);
                        }
                        warn!(
                            domain = %self.target,
                            redirects = self.cname_redirects,
                            "NAPTR CNAME redirect limit reached"
                        );
                    }
                }
                self.naptr_failed();
            }
        }
    }

    fn follow_naptr(&mut self, best: NaptrCandidate, answer: &DnsAnswer) {
        debug!(
            domain = %self.target,
            replacement = %best.replacement,
            transport = %best.transport,
            order = best.order,
            preference = best.preference,
            "Selected NAPTR record"
        );
        self.pin(best.transport, 0);

        let bundled = answer
            .additional_srv_records()
            .filter(|(rr, _)| rr.name == best.replacement);
        self.absorb_srv(bundled, best.transport);

        let replacement = best.replacement.clone();
        let transport = best.transport;
        self.naptr = Some(best);

        if self.srv_pool.is_empty() {
            self.issue_srv(replacement, transport);
        } else {
            self.srv_pool.sort();
            self.prime();
        }
    }

    fn naptr_failed(&mut self) {
        if !self.caps.srv {
            return self.fallback_to_host();
        }

        let wave: Vec<Transport> = if self.sips {
            if !self.settings.supports_transport(Transport::Tls) {
                debug!(domain = %self.target, "TLS not supported locally, nothing to try for sips");
                return self.transition(Phase::Finished);
            }
            [Transport::Tls, Transport::Dtls]
                .into_iter()
                .filter(|t| self.settings.supports_transport(*t))
                .collect()
        } else {
            [
                Transport::Tls,
                Transport::Dtls,
                Transport::Tcp,
                Transport::Udp,
                Transport::Sctp,
            ]
            .into_iter()
            .filter(|t| self.settings.supports_transport(*t))
            .collect()
        };

        if wave.is_empty() {
            return self.fallback_to_host();
        }
        for transport in wave {
            let name = transport.srv_name(&self.target);
            self.issue_srv(name, transport);
        }
    }

    fn issue_srv(&mut self, name: String, transport: Transport) {
        self.pending_srv += 1;
        self.issue(name, RecordType::SRV, Outstanding::Srv(transport));
    }

    fn on_srv(&mut self, query_transport: Transport, result: QueryResult) {
        self.pending_srv = self.pending_srv.saturating_sub(1);

        match result {
            Ok(answer) => {
                self.absorb_srv(answer.srv_records(), query_transport);
                self.absorb_glue(&answer.additional);
            }
            Err(e) => {
                debug!(domain = %self.target, transport = %query_transport, error = %e, "SRV lookup failed");
            }
        }

        if self.pending_srv == 0 {
            self.finish_srv_wave();
        }
    }

    /// Adds usable SRV records to the pool. The owner name's service label
    /// decides the transport; `fallback` applies when it carries none.
    fn absorb_srv<'a>(
        &mut self,
        records: impl Iterator<Item = (&'a ResourceRecord, &'a SrvData)>,
        fallback: Transport,
    ) {
        for (rr, srv) in records {
            if is_root_name(&srv.target) {
                continue;
            }
            let transport = Transport::from_srv_name(&rr.name).unwrap_or(fallback);
            if self.transport_pinned && self.transport != Some(transport) {
                continue;
            }
            if self.sips && !transport.is_secure() {
                continue;
            }
            self.srv_pool.push(SrvCandidate {
                priority: srv.priority,
                weight: srv.weight,
                port: srv.port,
                transport,
                target: normalize_name(&srv.target),
            });
        }
    }

    fn finish_srv_wave(&mut self) {
        if self.srv_pool.is_empty() {
            debug!(domain = %self.target, "No usable SRV records, falling back to host lookup");
            self.fallback_to_host();
        } else {
            self.srv_pool.sort();
            self.prime();
        }
    }

    fn fallback_to_host(&mut self) {
        let transport = match self.transport {
            Some(t) if self.transport_pinned => t,
            _ if self.sips => Transport::Tls,
            _ if self.settings.supports_transport(Transport::Udp) => Transport::Udp,
            _ if self.settings.supports_transport(Transport::Tcp) => Transport::Tcp,
            _ => Transport::Udp,
        };
        self.pin(transport, transport.default_port(self.sips));
        self.lookup_host(self.target.to_string());
    }

    /// Pops SRV candidates until one yields results from glue or needs a host query.
    fn prime(&mut self) {
        loop {
            let Some(next) = srv_selection::take_next(&mut self.srv_pool, &mut self.rng) else {
                return self.exhausted();
            };
            if !self.settings.supports_transport(next.transport) {
                continue;
            }
            self.transport = Some(next.transport);
            self.port = next.port;

            if let Some(tuples) = self.glue_tuples(&next.target) {
                for tuple in tuples {
                    self.accept(tuple);
                }
                if !self.results.is_empty() {
                    return self.transition(Phase::Available);
                }
                continue;
            }

            self.transition(Phase::Pending);
            return self.lookup_host(next.target);
        }
    }

    // ── address records ────────────────────────────────────────────────────

    fn lookup_host(&mut self, name: String) {
        let Some(transport) = self.transport else {
            return self.after_host_wave();
        };
        let v6 = self.settings.supports(transport, IpFamily::V6);
        let v4 = self.settings.supports(transport, IpFamily::V4);

        if v6 {
            self.host = Some(HostLookup {
                name: name.clone(),
                then_a: v4,
            });
            self.issue(name, RecordType::AAAA, Outstanding::Host(RecordType::AAAA));
        } else if v4 {
            self.host = Some(HostLookup {
                name: name.clone(),
                then_a: false,
            });
            self.issue(name, RecordType::A, Outstanding::Host(RecordType::A));
        } else {
            self.after_host_wave();
        }
    }

    fn on_host(&mut self, record_type: RecordType, result: QueryResult) {
        match result {
            Ok(answer) => {
                let addrs: Vec<IpAddr> = answer
                    .addresses()
                    .filter(|ip| match record_type {
                        RecordType::A => ip.is_ipv4(),
                        _ => ip.is_ipv6(),
                    })
                    .collect();
                self.push_addresses(&addrs);
            }
            Err(e) => {
                debug!(domain = %self.target, record_type = %record_type, error = %e, "Address lookup failed");
            }
        }

        if record_type == RecordType::AAAA {
            if let Some(host) = self.host.as_ref().filter(|h| h.then_a) {
                let name = host.name.clone();
                return self.issue(name, RecordType::A, Outstanding::Host(RecordType::A));
            }
        }
        self.host = None;
        self.after_host_wave();
    }

    fn push_addresses(&mut self, addrs: &[IpAddr]) {
        let Some(transport) = self.transport else {
            return;
        };
        for ip in addrs {
            if self.settings.supports(transport, IpFamily::of(ip)) {
                let tuple = Tuple::new(*ip, self.port, transport, Arc::clone(&self.target));
                self.accept(tuple);
            }
        }
    }

    fn after_host_wave(&mut self) {
        if !self.results.is_empty() {
            self.transition(Phase::Available);
        } else if !self.srv_pool.is_empty() {
            self.prime();
        } else {
            self.exhausted();
        }
    }

    // ── additional-section glue ────────────────────────────────────────────

    fn absorb_glue(&mut self, additional: &[ResourceRecord]) {
        let mut v4: FxHashMap<&str, Vec<IpAddr>> = FxHashMap::default();
        let mut v6: FxHashMap<&str, Vec<IpAddr>> = FxHashMap::default();
        for rr in additional {
            match rr.data {
                RecordData::A(a) => v4.entry(rr.name.as_str()).or_default().push(IpAddr::V4(a)),
                RecordData::Aaaa(a) => v6.entry(rr.name.as_str()).or_default().push(IpAddr::V6(a)),
                _ => {}
            }
        }
        // First response to mention a name wins.
        for (name, addrs) in v4 {
            self.glue_a.entry(name.to_string()).or_insert(addrs);
        }
        for (name, addrs) in v6 {
            self.glue_aaaa.entry(name.to_string()).or_insert(addrs);
        }
    }

    fn glue_tuples(&self, target: &str) -> Option<Vec<Tuple>> {
        let v6 = self.glue_aaaa.get(target);
        let v4 = self.glue_a.get(target);
        if v6.is_none() && v4.is_none() {
            return None;
        }
        let transport = self.transport?;
        let mut tuples = Vec::new();
        for (family, addrs) in [(IpFamily::V6, v6), (IpFamily::V4, v4)] {
            if !self.settings.supports(transport, family) {
                continue;
            }
            for ip in addrs.into_iter().flatten() {
                tuples.push(Tuple::new(
                    *ip,
                    self.port,
                    transport,
                    Arc::clone(&self.target),
                ));
            }
        }
        Some(tuples)
    }
}
