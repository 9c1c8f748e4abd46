use async_trait::async_trait;
use serde_json::json;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zonewatch::{
    DnsRecordResolver, DnsService, ErrorKind, LookupSupervisor, MergedReport, RecordType,
    ReconError, ReportSession, ReportSink, ResolvedRecord, SectionKind, SlotKey,
    SupervisorConfig, ZoneMetadataFetcher,
};

struct ExampleDns;

#[async_trait]
impl DnsService for ExampleDns {
    async fn resolve(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<ResolvedRecord>, ReconError> {
        match (name, record_type) {
            ("example.com", RecordType::Ns) => Ok(vec![
                ResolvedRecord::Ns("ns1.example.com.".into()),
                ResolvedRecord::Ns("ns2.example.com.".into()),
            ]),
            ("example.com", RecordType::A) => {
                Ok(vec![ResolvedRecord::A(Ipv4Addr::new(93, 184, 216, 34))])
            }
            ("_dmarc.example.com", RecordType::Txt) => Ok(vec![ResolvedRecord::Txt(vec![
                b"v=DMARC1; p=reject; pct=50".to_vec(),
            ])]),
            _ => Err(ReconError::NotFound(name.to_string())),
        }
    }
}

#[derive(Default)]
struct Recorder {
    reports: Vec<MergedReport>,
    failures: Vec<(SlotKey, ErrorKind, String)>,
    listed: Vec<Vec<String>>,
    selected: Vec<String>,
}

impl ReportSink for Recorder {
    fn on_snapshot_updated(&mut self, report: &MergedReport) {
        self.reports.push(report.clone());
    }

    fn on_task_failed(&mut self, slot: SlotKey, kind: ErrorKind, message: &str) {
        self.failures.push((slot, kind, message.to_string()));
    }

    fn on_domains_listed(&mut self, domains: &[String]) {
        self.listed.push(domains.to_vec());
    }

    fn on_domain_selected(&mut self, domain: &str) {
        self.selected.push(domain.to_string());
    }
}

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"success": true, "errors": [], "result": result}))
}

fn session(server: &MockServer) -> ReportSession<Recorder> {
    let dns = DnsRecordResolver::new(Arc::new(ExampleDns));
    let zone = ZoneMetadataFetcher::new(dns.clone())
        .base_url(server.uri())
        .requests_per_minute(0);
    let supervisor = LookupSupervisor::new(dns, zone, SupervisorConfig::default());
    ReportSession::new(supervisor, Recorder::default())
}

async fn mount_zone(server: &MockServer, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/zones"))
        .and(query_param("name", "example.com"))
        .respond_with(ok(json!([{"id": "z1", "name": "example.com"}])).set_delay(delay))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/zones/z1/healthchecks"))
        .respond_with(ok(json!([{"name": "web", "status": "healthy", "address": "93.184.216.34"}])))
        .mount(server)
        .await;
    // every other endpoint fails
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(server)
        .await;
}

async fn settle(session: &mut ReportSession<Recorder>) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while !session.is_settled() {
            session.step().await;
        }
    })
    .await
    .expect("lookups did not settle");
}

#[tokio::test]
async fn dns_renders_first_and_zone_sections_append() {
    let server = MockServer::start().await;
    mount_zone(&server, Duration::from_millis(300)).await;

    let mut session = session(&server);
    session.submit_query("example.com", "token").await;
    settle(&mut session).await;

    let reports = &session.sink().reports;
    assert_eq!(reports.len(), 2);

    let first = reports[0].render();
    assert!(first.starts_with(
        "=== DNS Lookup ===\nNS1: ns1.example.com\nNS2: ns2.example.com\nIPv4: 93.184.216.34\n"
    ));
    assert!(reports[0].section(SectionKind::Dmarc).is_none());

    let last = &reports[1];
    let kinds: Vec<_> = last.sections().iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        [SectionKind::Dns, SectionKind::Dmarc, SectionKind::HealthChecks]
    );
    assert!(last.render().contains("  web: healthy (93.184.216.34)"));
    assert_eq!(session.report(), last);
    assert!(session.sink().failures.is_empty());
    assert_eq!(session.zone_snapshot().map(|z| z.zone_id.clone()).as_deref(), Some("z1"));
}

#[tokio::test]
async fn empty_credential_reports_auth_failure_without_blocking_dns() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = session(&server);
    session.submit_query("example.com", "").await;
    settle(&mut session).await;

    let sink = session.sink();
    assert_eq!(
        sink.failures,
        [(SlotKey::Zone, ErrorKind::AuthFailure, "token is empty".to_string())]
    );
    assert_eq!(sink.reports.len(), 1);
    assert!(sink.reports[0].render().contains("IPv4: 93.184.216.34"));
}

#[tokio::test]
async fn new_query_discards_previous_report() {
    let server = MockServer::start().await;
    mount_zone(&server, Duration::from_secs(2)).await;

    let mut session = session(&server);
    let first = session.submit_query("example.com", "token").await;
    // wait for the DNS part of the first query only
    session.step().await;
    assert!(!session.report().is_empty());

    let second = session.submit_query("example.com", "").await;
    assert!(second > first);
    assert!(session.report().is_empty());
    settle(&mut session).await;

    let sink = session.sink();
    assert_eq!(sink.reports.len(), 2);
    assert!(sink.reports[1].section(SectionKind::HealthChecks).is_none());
    assert_eq!(sink.failures.len(), 1);
}

#[tokio::test]
async fn single_listed_domain_is_selected() {
    let server = MockServer::start().await;
    // serves both the unfiltered listing and the zone id lookup
    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ok(json!([{"id": "z1", "name": "example.com"}])))
        .mount(&server)
        .await;
    mount_zone(&server, Duration::ZERO).await;

    let mut session = session(&server);
    assert!(session.submit_credential("token").await.is_some());
    settle(&mut session).await;

    let sink = session.sink();
    assert_eq!(sink.listed, [vec!["example.com".to_string()]]);
    assert_eq!(sink.selected, ["example.com"]);
    assert!(session.generation().is_some());
    assert!(session
        .report()
        .section(SectionKind::HealthChecks)
        .is_some());
}

#[tokio::test]
async fn rejected_credential_on_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut session = session(&server);
    session.submit_credential("revoked").await;
    settle(&mut session).await;

    let sink = session.sink();
    assert!(sink.listed.is_empty());
    assert_eq!(sink.failures.len(), 1);
    assert_eq!(sink.failures[0].0, SlotKey::ProviderDomains);
    assert_eq!(sink.failures[0].1, ErrorKind::AuthFailure);
}
