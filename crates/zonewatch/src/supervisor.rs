//! Background task supervision.
//!
//! [`LookupSupervisor`] owns one task slot per [`SlotKey`]. Starting work in
//! a slot first invalidates the slot's live generation, then cancels the
//! running task and waits (bounded by [`SupervisorConfig::join_timeout`]) for
//! it to stop before the new task is spawned. Results travel back over a
//! single channel and are filtered by generation when they are consumed, so
//! a task that ignored cancellation can never publish a stale result.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;
use tracing::{debug, info_span, warn, Dispatch, Instrument};

use zonewatch_core::{
    DnsSnapshot, DomainQuery, ErrorKind, Generation, Result, SlotKey, ZoneError, ZoneSnapshot,
};
use zonewatch_recon::{DnsRecordResolver, DnsResolution, ZoneMetadataFetcher};

/// Default bound on waiting for a superseded task
pub const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Supervisor configuration
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// How long a restart waits for the previous task before abandoning it
    pub join_timeout: Duration,
    /// Logging sink for background tasks; `None` inherits the caller's
    pub log_dispatch: Option<Dispatch>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            join_timeout: DEFAULT_JOIN_TIMEOUT,
            log_dispatch: None,
        }
    }
}

impl SupervisorConfig {
    /// Silence all task logging
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.log_dispatch = Some(Dispatch::none());
        self
    }
}

/// Event delivered to the single consumer
#[derive(Debug, Clone)]
pub enum SupervisorEvent {
    /// DNS resolution finished
    DnsCompleted {
        /// Query generation
        generation: Generation,
        /// Resolved records, possibly empty
        snapshot: Arc<DnsSnapshot>,
        /// Set when nothing at all could be resolved
        unavailable: Option<String>,
    },
    /// Zone metadata fetch finished
    ZoneCompleted {
        /// Query generation
        generation: Generation,
        /// Collected metadata
        snapshot: Arc<ZoneSnapshot>,
    },
    /// The credential's domains were listed
    DomainsListed {
        /// Listing generation
        generation: Generation,
        /// Domain names
        domains: Vec<String>,
    },
    /// A task failed as a whole
    Failed {
        /// Slot of the failed task
        slot: SlotKey,
        /// Generation of the failed task
        generation: Generation,
        /// Failure class
        kind: ErrorKind,
        /// Human readable message
        message: String,
    },
}

impl SupervisorEvent {
    /// Slot the event belongs to
    #[must_use]
    pub const fn slot(&self) -> SlotKey {
        match self {
            Self::DnsCompleted { .. } => SlotKey::Dns,
            Self::ZoneCompleted { .. } => SlotKey::Zone,
            Self::DomainsListed { .. } => SlotKey::ProviderDomains,
            Self::Failed { slot, .. } => *slot,
        }
    }

    /// Generation of the task that produced the event
    #[must_use]
    pub const fn generation(&self) -> Generation {
        match self {
            Self::DnsCompleted { generation, .. }
            | Self::ZoneCompleted { generation, .. }
            | Self::DomainsListed { generation, .. }
            | Self::Failed { generation, .. } => *generation,
        }
    }
}

/// Raw result of one task, before generation filtering
#[derive(Debug)]
struct TaskReport {
    slot: SlotKey,
    generation: Generation,
    outcome: Outcome,
}

#[derive(Debug)]
enum Outcome {
    Dns(DnsResolution),
    Zone(Result<ZoneSnapshot>),
    Domains(Result<Vec<String>>),
}

/// A running task. Owned exclusively by the supervisor.
#[derive(Debug)]
struct TaskHandle {
    slot: SlotKey,
    generation: Generation,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl TaskHandle {
    /// Cancel and wait for the task; past `timeout` it is left to finish alone
    async fn stop(self, timeout: Duration) {
        self.cancel.cancel();
        match tokio::time::timeout(timeout, self.join).await {
            Ok(Ok(())) => {
                debug!(slot = %self.slot, generation = %self.generation, "task stopped");
            }
            Ok(Err(e)) => {
                warn!(slot = %self.slot, generation = %self.generation, error = %e, "task ended abnormally");
            }
            Err(_) => {
                warn!(slot = %self.slot, generation = %self.generation, "task did not stop in time, abandoning");
            }
        }
    }
}

/// Starts, supersedes and cancels background lookups
pub struct LookupSupervisor {
    dns: DnsRecordResolver,
    zone: ZoneMetadataFetcher,
    config: SupervisorConfig,
    counter: Generation,
    live: HashMap<SlotKey, Generation>,
    tasks: HashMap<SlotKey, TaskHandle>,
    tx: mpsc::UnboundedSender<TaskReport>,
    rx: mpsc::UnboundedReceiver<TaskReport>,
}

impl std::fmt::Debug for LookupSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupSupervisor")
            .field("counter", &self.counter)
            .field("live", &self.live)
            .field("running", &self.tasks.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl LookupSupervisor {
    /// Create a supervisor over the two collectors
    #[must_use]
    pub fn new(dns: DnsRecordResolver, zone: ZoneMetadataFetcher, config: SupervisorConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            dns,
            zone,
            config,
            counter: Generation::default(),
            live: HashMap::new(),
            tasks: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Generation currently accepted for `slot`
    #[must_use]
    pub fn live_generation(&self, slot: SlotKey) -> Option<Generation> {
        self.live.get(&slot).copied()
    }

    /// Returns true if `slot` has a task whose result has not been consumed
    #[must_use]
    pub fn is_running(&self, slot: SlotKey) -> bool {
        self.tasks.contains_key(&slot)
    }

    /// Returns true if no slot has pending work
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    fn next_generation(&mut self) -> Generation {
        self.counter = self.counter.next();
        self.counter
    }

    /// Start DNS resolution and the zone fetch for `domain`.
    ///
    /// Any running work in both slots is superseded. A blank domain only
    /// stops the running work.
    pub async fn submit_query(&mut self, domain: &str, credential: &str) -> Generation {
        let generation = self.next_generation();
        let query = DomainQuery::new(domain, credential, generation);

        if query.domain().is_empty() {
            debug!(generation = %generation, "blank domain, stopping lookups");
            self.stop_slot(SlotKey::Dns);
            self.stop_slot(SlotKey::Zone);
            return generation;
        }

        let dns = self.dns.clone();
        let name = query.domain().to_string();
        self.start(SlotKey::Dns, generation, move |_| async move {
            Outcome::Dns(dns.resolve(&name).await)
        })
        .await;

        let zone = self.zone.clone();
        self.start(SlotKey::Zone, generation, move |cancel| async move {
            Outcome::Zone(zone.fetch(query.domain(), query.credential(), &cancel).await)
        })
        .await;

        generation
    }

    /// List the domains visible to `credential`.
    ///
    /// A blank credential makes no call and returns `None`.
    pub async fn submit_credential(&mut self, credential: &str) -> Option<Generation> {
        if credential.trim().is_empty() {
            self.stop_slot(SlotKey::ProviderDomains);
            return None;
        }

        let generation = self.next_generation();
        let zone = self.zone.clone();
        let credential = credential.to_string();
        self.start(SlotKey::ProviderDomains, generation, move |_| async move {
            Outcome::Domains(zone.list_domains(&credential).await)
        })
        .await;
        Some(generation)
    }

    /// Cancel everything; no further events are delivered for current work
    pub fn cancel_all(&mut self) {
        for slot in SlotKey::ALL {
            self.stop_slot(slot);
        }
    }

    /// Invalidate and cancel a slot without waiting
    fn stop_slot(&mut self, slot: SlotKey) {
        self.live.remove(&slot);
        if let Some(handle) = self.tasks.remove(&slot) {
            debug!(slot = %slot, generation = %handle.generation, "cancelling task");
            handle.cancel.cancel();
        }
    }

    async fn start<F, Fut>(&mut self, slot: SlotKey, generation: Generation, work: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Outcome> + Send + 'static,
    {
        self.live.insert(slot, generation);

        if let Some(previous) = self.tasks.remove(&slot) {
            debug!(slot = %slot, superseded = %previous.generation, by = %generation, "superseding task");
            previous.stop(self.config.join_timeout).await;
        }

        let cancel = CancellationToken::new();
        let work = work(cancel.clone());
        let join = self.spawn(slot, generation, cancel.clone(), work);
        self.tasks.insert(
            slot,
            TaskHandle {
                slot,
                generation,
                cancel,
                join,
            },
        );
    }

    fn spawn<Fut>(
        &self,
        slot: SlotKey,
        generation: Generation,
        cancel: CancellationToken,
        work: Fut,
    ) -> JoinHandle<()>
    where
        Fut: Future<Output = Outcome> + Send + 'static,
    {
        let tx = self.tx.clone();
        let task = async move {
            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("cancelled before completion");
                    return;
                }
                outcome = work => outcome,
            };
            if tx.send(TaskReport { slot, generation, outcome }).is_err() {
                debug!("supervisor dropped, result discarded");
            }
        }
        .instrument(info_span!("lookup", slot = %slot, generation = generation.0));

        match &self.config.log_dispatch {
            Some(dispatch) => tokio::spawn(task.with_subscriber(dispatch.clone())),
            None => tokio::spawn(task),
        }
    }

    /// Wait for the next event of live work.
    ///
    /// Results of superseded or cancelled tasks are dropped here. Cancel
    /// safe: no event is lost if the returned future is dropped.
    pub async fn next_event(&mut self) -> SupervisorEvent {
        loop {
            // the supervisor holds a sender, so the channel never closes
            let Some(report) = self.rx.recv().await else {
                return std::future::pending().await;
            };

            if self.live.get(&report.slot) != Some(&report.generation) {
                debug!(slot = %report.slot, generation = %report.generation, "dropping stale result");
                continue;
            }

            if self
                .tasks
                .get(&report.slot)
                .is_some_and(|t| t.generation == report.generation)
            {
                self.tasks.remove(&report.slot);
            }

            return to_event(report);
        }
    }
}

fn failed(slot: SlotKey, generation: Generation, err: &ZoneError) -> SupervisorEvent {
    SupervisorEvent::Failed {
        slot,
        generation,
        kind: err.kind(),
        message: err.to_string(),
    }
}

fn to_event(report: TaskReport) -> SupervisorEvent {
    let TaskReport {
        slot,
        generation,
        outcome,
    } = report;

    match outcome {
        Outcome::Dns(resolution) => SupervisorEvent::DnsCompleted {
            generation,
            snapshot: Arc::new(resolution.snapshot),
            unavailable: resolution.error.map(|e| e.to_string()),
        },
        Outcome::Zone(Ok(snapshot)) => SupervisorEvent::ZoneCompleted {
            generation,
            snapshot: Arc::new(snapshot),
        },
        Outcome::Domains(Ok(domains)) => SupervisorEvent::DomainsListed { generation, domains },
        Outcome::Zone(Err(e)) | Outcome::Domains(Err(e)) => failed(slot, generation, &e),
    }
}
