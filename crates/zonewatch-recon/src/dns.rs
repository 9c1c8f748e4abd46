//! DNS resolution integration.

use crate::error::{ReconError, ReconResult};
use async_trait::async_trait;
use futures_util::future::join_all;
use hickory_resolver::{ResolveError, TokioResolver};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use zonewatch_core::{strip_root, DmarcPolicy, DnsSnapshot, RecordType};

/// Default per-query timeout
const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// One answer from a [`DnsService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRecord {
    /// Nameserver host
    Ns(String),
    /// IPv4 address
    A(Ipv4Addr),
    /// IPv6 address
    Aaaa(Ipv6Addr),
    /// Mail exchanger
    Mx {
        /// Preference, lower is preferred
        preference: u16,
        /// Exchange host
        exchange: String,
    },
    /// Text record as its raw character-string segments
    Txt(Vec<Vec<u8>>),
}

impl ResolvedRecord {
    /// Display value of the record; names lose their root dot and TXT
    /// segments are joined and decoded lossily
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Ns(name) => strip_root(name),
            Self::A(addr) => addr.to_string(),
            Self::Aaaa(addr) => addr.to_string(),
            Self::Mx {
                preference,
                exchange,
            } => format!("{preference} {}", strip_root(exchange)),
            Self::Txt(segments) => segments
                .iter()
                .map(|s| String::from_utf8_lossy(s))
                .collect(),
        }
    }
}

/// An authoritative DNS source. Each call is independent, nothing is cached.
#[async_trait]
pub trait DnsService: Send + Sync {
    /// Resolve `name` for one record type
    async fn resolve(&self, name: &str, record_type: RecordType) -> ReconResult<Vec<ResolvedRecord>>;
}

/// [`DnsService`] backed by the system resolver configuration
pub struct HickoryDns {
    resolver: TokioResolver,
}

impl HickoryDns {
    /// Create a service using the system resolver configuration
    pub fn new() -> ReconResult<Self> {
        let resolver = TokioResolver::builder_tokio()
            .map_err(|e| ReconError::Resolver(format!("failed to create resolver: {e}")))?
            .build();
        Ok(Self { resolver })
    }

    /// Wrap an already configured resolver
    #[must_use]
    pub const fn from_resolver(resolver: TokioResolver) -> Self {
        Self { resolver }
    }
}

impl std::fmt::Debug for HickoryDns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HickoryDns").finish_non_exhaustive()
    }
}

fn map_resolve_error(name: &str, err: &ResolveError) -> ReconError {
    if err.is_no_records_found() {
        ReconError::NotFound(name.to_string())
    } else {
        ReconError::Dns(err.to_string())
    }
}

#[async_trait]
impl DnsService for HickoryDns {
    async fn resolve(&self, name: &str, record_type: RecordType) -> ReconResult<Vec<ResolvedRecord>> {
        let map_err = |e: ResolveError| map_resolve_error(name, &e);
        let records = match record_type {
            RecordType::Ns => self
                .resolver
                .ns_lookup(name)
                .await
                .map_err(map_err)?
                .iter()
                .map(|ns| ResolvedRecord::Ns(ns.to_string()))
                .collect(),
            RecordType::A => self
                .resolver
                .ipv4_lookup(name)
                .await
                .map_err(map_err)?
                .iter()
                .map(|a| ResolvedRecord::A(a.0))
                .collect(),
            RecordType::Aaaa => self
                .resolver
                .ipv6_lookup(name)
                .await
                .map_err(map_err)?
                .iter()
                .map(|aaaa| ResolvedRecord::Aaaa(aaaa.0))
                .collect(),
            RecordType::Mx => self
                .resolver
                .mx_lookup(name)
                .await
                .map_err(map_err)?
                .iter()
                .map(|mx| ResolvedRecord::Mx {
                    preference: mx.preference(),
                    exchange: mx.exchange().to_string(),
                })
                .collect(),
            RecordType::Txt => self
                .resolver
                .txt_lookup(name)
                .await
                .map_err(map_err)?
                .iter()
                .map(|txt| ResolvedRecord::Txt(txt.txt_data().iter().map(|s| s.to_vec()).collect()))
                .collect(),
        };
        Ok(records)
    }
}

/// Outcome of resolving one domain.
///
/// `error` is set only when every query failed; it is meant for placeholder
/// text and never blocks merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsResolution {
    /// Whatever could be resolved, possibly empty
    pub snapshot: DnsSnapshot,
    /// First failure when nothing could be resolved at all
    pub error: Option<ReconError>,
}

/// Resolves the record set shown for a domain
#[derive(Clone)]
pub struct DnsRecordResolver {
    service: Arc<dyn DnsService>,
    query_timeout: Duration,
}

impl std::fmt::Debug for DnsRecordResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsRecordResolver")
            .field("query_timeout", &self.query_timeout)
            .finish_non_exhaustive()
    }
}

impl DnsRecordResolver {
    /// Create a resolver on top of a DNS service
    pub fn new(service: Arc<dyn DnsService>) -> Self {
        Self {
            service,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Create a resolver using the system DNS configuration
    pub fn system() -> ReconResult<Self> {
        Ok(Self::new(Arc::new(HickoryDns::new()?)))
    }

    /// Bound every single query
    #[must_use]
    pub const fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    async fn query(&self, name: &str, record_type: RecordType) -> ReconResult<Vec<ResolvedRecord>> {
        tokio::time::timeout(self.query_timeout, self.service.resolve(name, record_type))
            .await
            .map_err(|_| ReconError::Timeout)?
    }

    /// Resolve NS, A, AAAA, MX and TXT for `domain`. Never fails: each
    /// failed query counts as zero records of its type.
    pub async fn resolve(&self, domain: &str) -> DnsResolution {
        let answers = join_all(
            RecordType::QUERIED
                .iter()
                .map(|&record_type| async move { (record_type, self.query(domain, record_type).await) }),
        )
        .await;

        let mut builder = DnsSnapshot::builder();
        let mut first_error = None;
        let mut failures = 0;

        for (record_type, answer) in answers {
            let records = match answer {
                Ok(records) => {
                    debug!(domain, record_type = %record_type, count = records.len(), "DNS answer");
                    records
                }
                Err(err) => {
                    match &err {
                        ReconError::NotFound(_) => {
                            debug!(domain, record_type = %record_type, "no records");
                        }
                        other => {
                            warn!(domain, record_type = %record_type, error = %other, "DNS query failed");
                        }
                    }
                    failures += 1;
                    first_error.get_or_insert(err);
                    continue;
                }
            };

            for record in records {
                builder = match record {
                    ResolvedRecord::Ns(name) => builder.nameserver(name),
                    ResolvedRecord::A(addr) => {
                        let value = addr.to_string();
                        builder.ipv4(value.clone()).record(RecordType::A, value)
                    }
                    other => builder.record(record_type, other.render()),
                };
            }
        }

        let error = (failures == RecordType::QUERIED.len()).then_some(first_error).flatten();
        DnsResolution {
            snapshot: builder.build(),
            error,
        }
    }

    /// TXT values of `name`, one string per record
    pub async fn txt(&self, name: &str) -> ReconResult<Vec<String>> {
        let records = self.query(name, RecordType::Txt).await?;
        Ok(records.iter().map(ResolvedRecord::render).collect())
    }

    /// DMARC policy published at `_dmarc.<domain>`.
    ///
    /// Lookup failures and unparsable records both mean "no policy".
    pub async fn dmarc(&self, domain: &str) -> Option<DmarcPolicy> {
        let name = format!("_dmarc.{domain}");
        match self.txt(&name).await {
            Ok(values) => {
                let policy = DmarcPolicy::from_txt_records(&values);
                debug!(domain, found = policy.is_some(), "DMARC lookup");
                policy
            }
            Err(e) => {
                debug!(domain, error = %e, "no DMARC record");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeDns {
        answers: HashMap<(String, RecordType), ReconResult<Vec<ResolvedRecord>>>,
        delay: Option<Duration>,
    }

    impl FakeDns {
        fn answer(mut self, name: &str, record_type: RecordType, records: Vec<ResolvedRecord>) -> Self {
            self.answers.insert((name.to_string(), record_type), Ok(records));
            self
        }

        fn fail(mut self, name: &str, record_type: RecordType, err: ReconError) -> Self {
            self.answers.insert((name.to_string(), record_type), Err(err));
            self
        }
    }

    #[async_trait]
    impl DnsService for FakeDns {
        async fn resolve(&self, name: &str, record_type: RecordType) -> ReconResult<Vec<ResolvedRecord>> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.answers
                .get(&(name.to_string(), record_type))
                .cloned()
                .unwrap_or_else(|| Err(ReconError::NotFound(name.to_string())))
        }
    }

    fn resolver(fake: FakeDns) -> DnsRecordResolver {
        DnsRecordResolver::new(Arc::new(fake))
    }

    #[tokio::test]
    async fn example_com_scenario() {
        let fake = FakeDns::default()
            .answer(
                "example.com",
                RecordType::Ns,
                vec![
                    ResolvedRecord::Ns("ns1.example.com.".into()),
                    ResolvedRecord::Ns("ns2.example.com.".into()),
                    ResolvedRecord::Ns("ns3.example.com.".into()),
                ],
            )
            .answer(
                "example.com",
                RecordType::A,
                vec![ResolvedRecord::A(Ipv4Addr::new(93, 184, 216, 34))],
            )
            .answer(
                "example.com",
                RecordType::Mx,
                vec![ResolvedRecord::Mx {
                    preference: 10,
                    exchange: "mail.example.com.".into(),
                }],
            )
            .answer(
                "example.com",
                RecordType::Txt,
                vec![ResolvedRecord::Txt(vec![b"v=spf1 ".to_vec(), b"-all".to_vec()])],
            );

        let resolution = resolver(fake).resolve("example.com").await;
        let snap = resolution.snapshot;
        assert_eq!(snap.nameservers(), ["ns1.example.com", "ns2.example.com"]);
        assert_eq!(snap.ipv4(), Some("93.184.216.34"));
        let lines: Vec<_> = snap.records().iter().map(|r| r.rendered()).collect();
        assert_eq!(
            lines,
            ["A    93.184.216.34", "MX   10 mail.example.com", "TXT  v=spf1 -all"]
        );
        assert!(resolution.error.is_none());
    }

    #[tokio::test]
    async fn total_failure_is_empty_snapshot_with_error() {
        let fake = FakeDns::default().fail("bad..name", RecordType::Ns, ReconError::Dns("malformed".into()));
        let resolution = resolver(fake).resolve("bad..name").await;
        assert!(resolution.snapshot.is_empty());
        assert_eq!(resolution.error, Some(ReconError::Dns("malformed".into())));
    }

    #[tokio::test]
    async fn one_failure_does_not_hide_others() {
        let fake = FakeDns::default()
            .fail("example.org", RecordType::Ns, ReconError::Timeout)
            .answer(
                "example.org",
                RecordType::Aaaa,
                vec![ResolvedRecord::Aaaa("2001:db8::1".parse().unwrap())],
            );
        let resolution = resolver(fake).resolve("example.org").await;
        assert!(resolution.snapshot.nameservers().is_empty());
        assert_eq!(resolution.snapshot.records()[0].rendered(), "AAAA 2001:db8::1");
        assert!(resolution.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_queries_time_out_as_empty() {
        let fake = FakeDns {
            delay: Some(Duration::from_secs(60)),
            ..FakeDns::default()
        };
        let resolution = resolver(fake)
            .with_query_timeout(Duration::from_secs(1))
            .resolve("example.net")
            .await;
        assert!(resolution.snapshot.is_empty());
        assert_eq!(resolution.error, Some(ReconError::Timeout));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let txt = ResolvedRecord::Txt(vec![vec![b'o', b'k', 0xff]]);
        assert_eq!(txt.render(), "ok\u{fffd}");
    }

    #[tokio::test]
    async fn dmarc_first_matching_record() {
        let fake = FakeDns::default().answer(
            "_dmarc.example.com",
            RecordType::Txt,
            vec![
                ResolvedRecord::Txt(vec![b"unrelated".to_vec()]),
                ResolvedRecord::Txt(vec![b"v=DMARC1; p=reject; pct=50".to_vec()]),
            ],
        );
        let policy = resolver(fake).dmarc("example.com").await.unwrap();
        assert_eq!(policy.raw(), "v=DMARC1; p=reject; pct=50");
        assert_eq!(policy.get("pct"), Some("50"));
    }

    #[tokio::test]
    async fn dmarc_missing_is_none() {
        assert!(resolver(FakeDns::default()).dmarc("example.com").await.is_none());
    }
}
