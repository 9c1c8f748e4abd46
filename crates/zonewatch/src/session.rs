//! Reactive report state for one consumer.
//!
//! A [`ReportSession`] keeps the latest DNS and zone snapshot of the current
//! query and re-merges whenever either one arrives, so the DNS section can be
//! shown right away and the zone sections appear when they are ready.

use std::sync::Arc;

use tracing::{debug, info};
use zonewatch_core::{
    merge, DnsSnapshot, ErrorKind, Generation, MergedReport, SlotKey, ZoneSnapshot,
};

use crate::supervisor::{LookupSupervisor, SupervisorEvent};

/// Receives everything the presentation layer shows
pub trait ReportSink: Send {
    /// The merged report of the current query changed
    fn on_snapshot_updated(&mut self, report: &MergedReport);

    /// A whole task failed; the report keeps whatever it already has
    fn on_task_failed(&mut self, slot: SlotKey, kind: ErrorKind, message: &str);

    /// Nothing at all could be resolved; placeholder text only
    fn on_dns_unavailable(&mut self, _message: &str) {}

    /// The credential's domains were listed
    fn on_domains_listed(&mut self, _domains: &[String]) {}

    /// A domain was picked without user input
    fn on_domain_selected(&mut self, _domain: &str) {}
}

/// Drives a [`LookupSupervisor`] and feeds a [`ReportSink`]
#[derive(Debug)]
pub struct ReportSession<S> {
    supervisor: LookupSupervisor,
    sink: S,
    generation: Option<Generation>,
    credential: String,
    dns: Option<Arc<DnsSnapshot>>,
    zone: Option<Arc<ZoneSnapshot>>,
    report: MergedReport,
    domains: Vec<String>,
}

impl<S: ReportSink> ReportSession<S> {
    /// Create a session
    pub fn new(supervisor: LookupSupervisor, sink: S) -> Self {
        Self {
            supervisor,
            sink,
            generation: None,
            credential: String::new(),
            dns: None,
            zone: None,
            report: MergedReport::default(),
            domains: Vec::new(),
        }
    }

    /// Start a new query; the previous report is discarded
    pub async fn submit_query(&mut self, domain: &str, credential: &str) -> Generation {
        credential.clone_into(&mut self.credential);
        let generation = self.supervisor.submit_query(domain, credential).await;
        self.generation = Some(generation);
        self.dns = None;
        self.zone = None;
        self.report = MergedReport::default();
        generation
    }

    /// Switch credential and list its domains
    pub async fn submit_credential(&mut self, credential: &str) -> Option<Generation> {
        credential.clone_into(&mut self.credential);
        self.domains.clear();
        self.supervisor.submit_credential(credential).await
    }

    /// Stop all work; the current report stays as it is
    pub fn cancel_all(&mut self) {
        self.supervisor.cancel_all();
        self.generation = None;
    }

    /// Wait for the next supervisor event. Cancel safe.
    pub async fn next_event(&mut self) -> SupervisorEvent {
        self.supervisor.next_event().await
    }

    /// Wait for one event and apply it
    pub async fn step(&mut self) {
        let event = self.next_event().await;
        self.apply(event).await;
    }

    /// Apply one event to the report state
    pub async fn apply(&mut self, event: SupervisorEvent) {
        if event.slot() != SlotKey::ProviderDomains && self.generation != Some(event.generation()) {
            debug!(generation = %event.generation(), "ignoring event of an old query");
            return;
        }

        match event {
            SupervisorEvent::DnsCompleted {
                snapshot,
                unavailable,
                ..
            } => {
                if let Some(message) = unavailable {
                    self.sink.on_dns_unavailable(&message);
                }
                self.dns = Some(snapshot);
                self.remerge();
            }
            SupervisorEvent::ZoneCompleted { snapshot, .. } => {
                self.zone = Some(snapshot);
                self.remerge();
            }
            SupervisorEvent::DomainsListed { domains, .. } => {
                self.sink.on_domains_listed(&domains);
                self.domains = domains;
                if let [only] = self.domains.as_slice() {
                    let domain = only.clone();
                    let credential = self.credential.clone();
                    info!(domain = %domain, "single domain, selecting it");
                    self.sink.on_domain_selected(&domain);
                    self.submit_query(&domain, &credential).await;
                }
            }
            SupervisorEvent::Failed {
                slot,
                kind,
                message,
                ..
            } => {
                self.sink.on_task_failed(slot, kind, &message);
            }
        }
    }

    fn remerge(&mut self) {
        self.report = merge(self.dns.as_deref(), self.zone.as_deref());
        self.sink.on_snapshot_updated(&self.report);
    }

    /// Latest merged report of the current query
    pub const fn report(&self) -> &MergedReport {
        &self.report
    }

    /// Latest DNS snapshot of the current query
    pub fn dns_snapshot(&self) -> Option<Arc<DnsSnapshot>> {
        self.dns.clone()
    }

    /// Latest zone snapshot of the current query
    pub fn zone_snapshot(&self) -> Option<Arc<ZoneSnapshot>> {
        self.zone.clone()
    }

    /// Domains of the last listing
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Generation of the current query
    pub const fn generation(&self) -> Option<Generation> {
        self.generation
    }

    /// Returns true once no task has a pending result
    pub fn is_settled(&self) -> bool {
        self.supervisor.is_idle()
    }

    /// The sink
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// The sink, mutably
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
