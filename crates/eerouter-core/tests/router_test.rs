#![allow(clippy::unwrap_used)]
// Router pipeline and session tests over an in-memory transport.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use secrecy::SecretString;

use eerouter_api::{Error, Method, Request, Response, Transport};
use eerouter_core::{CoreError, DeviceScanner, Generation, Router, RouterConfig};

// ── Fake transport ──────────────────────────────────────────────────

#[derive(Debug, Default)]
struct State {
    routes: HashMap<String, (u16, String)>,
    requests: Vec<Request>,
}

/// Answers by URL path and records every request. Unrouted paths fail
/// like an unreachable host.
#[derive(Clone, Debug, Default)]
struct FakeTransport {
    state: Arc<Mutex<State>>,
}

impl FakeTransport {
    fn route(self, path: &str, status: u16, body: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert(path.to_owned(), (status, body.to_owned()));
        self
    }

    fn requests(&self) -> Vec<Request> {
        self.state.lock().unwrap().requests.clone()
    }

    fn count(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.url.path() == path)
            .count()
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: Request) -> Result<Response, Error> {
        let mut state = self.state.lock().unwrap();
        let route = state.routes.get(request.url.path()).cloned();
        let url = request.url.to_string();
        state.requests.push(request);
        match route {
            Some((status, body)) => Ok(Response { status, body }),
            None => Err(Error::Unreachable {
                url,
                reason: "connection refused".into(),
            }),
        }
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

const LOGIN_OK: &str = "<html><script>var new_urn = 'sess01';</script></html>";
const LOGIN_REJECTED: &str = "<html>Incorrect password</html>";

fn device_block(mac: &str, hostname: &str, port: &str, active: &str) -> String {
    format!(
        "{{mac:'{mac}',hostname:'{hostname}',port:'{port}',ip:'192.168.1.64',ipv6:'',ipv6_ll:'',\
         time_first_seen:'2024/01/02 03:04:05',time_last_active:'2024/05/06 07:08:09',\
         activity:'{active}',activity_ip:'{active}',activity_ipv6:'0',activity_ipv6_ll:'0',\
         dhcp_option:'NA',name:'{hostname}',os:'Unknown',device:'Unknown',device_oui:'',\
         device_serial:'',device_class:''}}"
    )
}

fn status_xml(devices: &[String]) -> String {
    format!(
        r#"<?xml version="1.0"?>
<status>
  <deviceDB value="[{}]"/>
  <ssid_ssid value="'home','guest'"/>
  <ssid_ssidEnable value="'1','1'"/>
  <ssid_security value="'4'"/>
  <ssid_wpaPassword value="'s3cret','visitor'"/>
  <ssid_broadcast value="'1','0'"/>
</status>"#,
        devices.join(",")
    )
}

fn brightbox(transport: FakeTransport) -> Router<FakeTransport> {
    let config = RouterConfig {
        version: 2,
        password: Some(SecretString::from("password")),
        ..RouterConfig::default()
    };
    Router::with_transport(&config, transport).unwrap()
}

fn smarthub(transport: FakeTransport) -> Router<FakeTransport> {
    let config = RouterConfig {
        version: 3,
        ..RouterConfig::default()
    };
    Router::with_transport(&config, transport).unwrap()
}

fn brightbox_transport() -> FakeTransport {
    FakeTransport::default()
        .route("/login.cgi", 200, LOGIN_OK)
        .route("/logout.cgi", 200, "")
        .route(
            "/status_conn.xml",
            200,
            &status_xml(&[
                device_block("AA:BB:CC:DD:EE:01", "laptop", "eth0_1", "1"),
                device_block("AA:BB:CC:DD:EE:02", "phone", "ath0", "0"),
                device_block("AA:BB:CC:DD:EE:03", "tv", "ath1", "1"),
            ]),
        )
}

// ── Factory ─────────────────────────────────────────────────────────

#[test]
fn test_unsupported_version_makes_no_requests() {
    let transport = FakeTransport::default();
    let config = RouterConfig {
        version: 4,
        password: Some(SecretString::from("password")),
        ..RouterConfig::default()
    };
    let err = Router::with_transport(&config, transport.clone()).unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedVersion { version: 4 }));
    assert!(transport.requests().is_empty());
}

#[test]
fn test_default_hosts_per_generation() {
    assert_eq!(brightbox(FakeTransport::default()).host(), "192.168.1.1");
    assert_eq!(smarthub(FakeTransport::default()).host(), "192.168.1.254");
    assert_eq!(
        smarthub(FakeTransport::default()).generation(),
        Generation::SmartHub
    );
}

// ── BrightBox 2 session ─────────────────────────────────────────────

#[tokio::test]
async fn test_session_scope_logs_out_once_after_success() {
    let transport = brightbox_transport();
    let mut router = brightbox(transport.clone());

    let devices = router
        .with_session(async |r| r.get_devices().await)
        .await
        .unwrap();

    assert_eq!(devices.len(), 3);
    assert_eq!(transport.count("/login.cgi"), 1);
    assert_eq!(transport.count("/logout.cgi"), 1);
    assert!(!router.is_authenticated());
}

#[tokio::test]
async fn test_session_scope_logs_out_once_after_body_error() {
    let transport = brightbox_transport();
    let mut router = brightbox(transport.clone());

    let result: Result<(), CoreError> = router
        .with_session(async |r| {
            r.get_devices().await?;
            Err(CoreError::InvalidResponse {
                message: "body failed".into(),
            })
        })
        .await;

    assert!(matches!(result, Err(CoreError::InvalidResponse { .. })));
    assert_eq!(transport.count("/logout.cgi"), 1);
    assert!(!router.is_authenticated());
}

#[tokio::test]
async fn test_cancelled_session_stays_open_until_forget() {
    let transport = brightbox_transport();
    let mut router = brightbox(transport.clone());

    let cancelled = tokio::time::timeout(
        std::time::Duration::from_millis(20),
        router.with_session(async |_r| std::future::pending::<Result<(), CoreError>>().await),
    )
    .await;

    assert!(cancelled.is_err());
    assert_eq!(transport.count("/login.cgi"), 1);
    assert_eq!(transport.count("/logout.cgi"), 0);
    assert!(router.is_authenticated());

    router.forget().await;
    assert_eq!(transport.count("/logout.cgi"), 1);
    assert!(!router.is_authenticated());
}

#[tokio::test]
async fn test_failed_login_never_runs_body() {
    let transport = FakeTransport::default()
        .route("/login.cgi", 200, LOGIN_REJECTED)
        .route("/logout.cgi", 200, "");
    let mut router = brightbox(transport.clone());

    let mut ran = false;
    let result = router
        .with_session(async |_| {
            ran = true;
            Ok(())
        })
        .await;

    assert!(matches!(result, Err(CoreError::AuthenticationFailed { .. })));
    assert!(!ran);
    assert_eq!(transport.count("/logout.cgi"), 0);
}

#[tokio::test]
async fn test_unreachable_login_is_false() {
    let mut router = brightbox(FakeTransport::default());
    assert!(!router.authenticate().await);
    assert!(!router.is_authenticated());
}

#[tokio::test]
async fn test_login_posts_digest_and_session_cookie_is_sent() {
    let transport = brightbox_transport();
    let mut router = brightbox(transport.clone());

    assert!(router.authenticate().await);
    router.get_devices().await.unwrap();
    router.forget().await;

    let requests = transport.requests();
    let login = &requests[0];
    assert_eq!(login.method, Method::Post);
    let form = login.form.clone().unwrap();
    assert!(form.contains(&("pws".into(), "5f4dcc3b5aa765d61d8327deb882cf99".into())));
    assert!(form.contains(&("usr".into(), "admin".into())));
    assert!(form.contains(&("GO".into(), "status.htm".into())));

    assert_eq!(requests[1].cookie_header().as_deref(), Some("urn=sess01"));
    assert_eq!(requests[2].url.path(), "/logout.cgi");
    assert_eq!(requests[2].cookie_header().as_deref(), Some("urn=sess01"));
}

#[tokio::test]
async fn test_forget_clears_session_even_when_logout_fails() {
    let transport = FakeTransport::default().route("/login.cgi", 200, LOGIN_OK);
    let mut router = brightbox(transport);

    assert!(router.authenticate().await);
    router.forget().await;
    assert!(!router.is_authenticated());
    assert!(matches!(
        router.get_devices().await,
        Err(CoreError::AuthenticationRequired)
    ));
}

// ── BrightBox 2 data ────────────────────────────────────────────────

#[tokio::test]
async fn test_active_devices_are_subset_filtered_on_activity_ip() {
    let mut router = brightbox(brightbox_transport());
    assert!(router.authenticate().await);

    let all = router.get_devices().await.unwrap();
    let active = router.get_active_devices().await.unwrap();

    assert_eq!(active.len(), 2);
    assert!(active.iter().all(|d| d.activity_ip));
    assert!(active.iter().all(|a| all.contains(a)));
    assert_eq!(
        all.iter().filter(|d| d.activity_ip).count(),
        active.len()
    );
}

#[tokio::test]
async fn test_device_fields_are_normalized() {
    let mut router = brightbox(brightbox_transport());
    assert!(router.authenticate().await);

    let devices = router.get_devices().await.unwrap();
    let laptop = &devices[0];
    assert_eq!(laptop.mac, "AA:BB:CC:DD:EE:01");
    assert_eq!(laptop.hostname.as_deref(), Some("laptop"));
    assert_eq!(laptop.ipv6, None);
    assert_eq!(laptop.dhcp_option, None);
    assert_eq!(
        laptop.time_last_active.as_ref().map(ToString::to_string).as_deref(),
        Some("2024/05/06 07:08:09")
    );
    assert!(laptop.time_first_seen.as_ref().unwrap().as_datetime().is_some());
}

#[tokio::test]
async fn test_ssids_align_with_short_field_list() {
    let mut router = brightbox(brightbox_transport());
    assert!(router.authenticate().await);

    let ssids = router.get_ssids().await.unwrap();
    assert_eq!(ssids.len(), 2);
    assert_eq!(ssids[0].ssid, "home");
    assert_eq!(ssids[0].security, Some(4));
    assert_eq!(ssids[1].ssid, "guest");
    assert_eq!(ssids[1].security, None);
    assert!(!ssids[1].broadcast);
}

#[tokio::test]
async fn test_status_fetch_failure_yields_empty_list() {
    let transport = FakeTransport::default().route("/login.cgi", 200, LOGIN_OK);
    let mut router = brightbox(transport);
    assert!(router.authenticate().await);

    assert!(router.get_devices().await.unwrap().is_empty());
    assert!(router.get_ssids().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_status_yields_empty_list() {
    let transport = FakeTransport::default()
        .route("/login.cgi", 200, LOGIN_OK)
        .route("/status_conn.xml", 200, "<status><deviceDB></status>");
    let mut router = brightbox(transport);
    assert!(router.authenticate().await);

    assert!(router.get_devices().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_incomplete_device_record_is_raised() {
    let transport = FakeTransport::default()
        .route("/login.cgi", 200, LOGIN_OK)
        .route(
            "/status_conn.xml",
            200,
            &status_xml(&["{mac:'AA:BB:CC:DD:EE:01',hostname:'laptop'}".to_owned()]),
        );
    let mut router = brightbox(transport);
    assert!(router.authenticate().await);

    assert!(matches!(
        router.get_devices().await,
        Err(CoreError::MalformedRecord(_))
    ));
}

// ── Smart Hub ───────────────────────────────────────────────────────

fn script_device(mac: &str, activity_ip: &str, ip: &str) -> String {
    format!(
        "{{mac:'{mac}',hostname:'hub-client',port:'eth0,ath0',ip:'{ip}',ipv6:'',ipv6_ll:'',\
         time_first_seen:'2024/01/02 03:04:05',time_last_active:'NA',activity:1,\
         activity_ip:'{activity_ip}',activity_ipv6:'0',activity_ipv6_ll:'0',dhcp_option:'',\
         name:'',os:'',device:'',device_oui:'',device_serial:'',device_class:''}}"
    )
}

fn network_script(devices: &[String]) -> String {
    format!(
        "// network page\nvar hub_name = 'EE';\nvar known_device_list = [\n{}\n];\nfunction render() {{}}\n",
        devices.join(",\n")
    )
}

#[tokio::test]
async fn test_smarthub_splits_multimac_entries() {
    let transport = FakeTransport::default().route(
        "/cgi/cgi_myNetwork.js",
        200,
        &network_script(&[
            script_device("AA:AA:AA:AA:AA:01,AA:AA:AA:AA:AA:02", "1,0", "192.168.1.70,192.168.1.71"),
            script_device("BB:BB:BB:BB:BB:01", "1", "192.168.1.80"),
        ]),
    );
    let router = smarthub(transport.clone());

    let devices = router.get_devices().await.unwrap();
    let macs: Vec<&str> = devices.iter().map(|d| d.mac.as_str()).collect();
    assert_eq!(
        macs,
        ["AA:AA:AA:AA:AA:01", "AA:AA:AA:AA:AA:02", "BB:BB:BB:BB:BB:01"]
    );
    assert_eq!(devices[0].ip.as_deref(), Some("192.168.1.70"));
    assert_eq!(devices[1].ip.as_deref(), Some("192.168.1.71"));
    assert_eq!(devices[0].port.as_deref(), Some("eth0"));
    assert_eq!(devices[1].port.as_deref(), Some("ath0"));
    assert!(devices[0].activity && devices[0].activity_ip);
    assert!(!devices[1].activity && !devices[1].activity_ip);
    assert_eq!(devices[1].hostname.as_deref(), Some("hub-client"));
    assert_eq!(devices[2].time_last_active, None);

    let active = router.get_active_devices().await.unwrap();
    assert_eq!(active.len(), 2);
    assert_eq!(transport.count("/login.cgi"), 0);
}

#[tokio::test]
async fn test_smarthub_missing_list_yields_empty() {
    let transport =
        FakeTransport::default().route("/cgi/cgi_myNetwork.js", 200, "var something_else = [];");
    let router = smarthub(transport);
    assert!(router.get_devices().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_smarthub_syntax_error_yields_empty() {
    let transport = FakeTransport::default().route(
        "/cgi/cgi_myNetwork.js",
        200,
        "var known_device_list = [{mac:'x'",
    );
    let router = smarthub(transport);
    assert!(router.get_devices().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_smarthub_oversized_expression_yields_empty() {
    let concat = vec!["'a'"; 200_000].join(" + ");
    let transport = FakeTransport::default().route(
        "/cgi/cgi_myNetwork.js",
        200,
        &format!("var banner = {concat};\nvar known_device_list = [{{mac:'m'}}];"),
    );
    let router = smarthub(transport);
    assert!(router.get_devices().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_smarthub_session_scope_has_no_login() {
    let transport = FakeTransport::default().route(
        "/cgi/cgi_myNetwork.js",
        200,
        &network_script(&[script_device("BB:BB:BB:BB:BB:01", "1", "192.168.1.80")]),
    );
    let mut router = smarthub(transport.clone());

    let devices = router
        .with_session(async |r| r.get_active_devices().await)
        .await
        .unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(transport.count("/login.cgi"), 0);
    assert_eq!(transport.count("/logout.cgi"), 0);
}

// ── Scanner ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_scanner_reports_active_macs_and_attributes() {
    let transport = brightbox_transport();
    let mut scanner = DeviceScanner::new(brightbox(transport.clone()));

    let macs = scanner.scan_devices().await.unwrap();
    assert_eq!(macs, ["AA:BB:CC:DD:EE:01", "AA:BB:CC:DD:EE:03"]);
    assert_eq!(transport.count("/logout.cgi"), 1);

    assert_eq!(scanner.device_name("AA:BB:CC:DD:EE:02"), Some("phone"));
    assert_eq!(scanner.device_name("00:00:00:00:00:00"), None);

    let attrs = scanner.extra_attributes("AA:BB:CC:DD:EE:03").unwrap();
    assert_eq!(attrs.port.as_deref(), Some("wifi2.4Ghz"));
    assert_eq!(attrs.ip.as_deref(), Some("192.168.1.64"));
    assert!(scanner.extra_attributes("00:00:00:00:00:00").is_none());
}

#[tokio::test]
async fn test_scanner_check_config() {
    let mut good = DeviceScanner::new(brightbox(brightbox_transport()));
    assert!(good.check_config().await);

    let rejected = FakeTransport::default().route("/login.cgi", 200, LOGIN_REJECTED);
    let mut bad = DeviceScanner::new(brightbox(rejected));
    assert!(!bad.check_config().await);

    let empty = FakeTransport::default()
        .route("/login.cgi", 200, LOGIN_OK)
        .route("/logout.cgi", 200, "")
        .route("/status_conn.xml", 200, &status_xml(&[]));
    let mut none = DeviceScanner::new(brightbox(empty));
    assert!(!none.check_config().await);
}

#[tokio::test]
async fn test_scanner_auth_failure_is_raised() {
    let rejected = FakeTransport::default().route("/login.cgi", 200, LOGIN_REJECTED);
    let mut scanner = DeviceScanner::new(brightbox(rejected));
    assert!(matches!(
        scanner.scan_devices().await,
        Err(CoreError::AuthenticationFailed { .. })
    ));
}
