#![allow(clippy::unwrap_used)]
// Integration tests for the BrightBox 2 and Smart Hub clients using wiremock.

use secrecy::SecretString;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eerouter_api::parse::ParseError;
use eerouter_api::{BrightBox2Client, Error, HttpTransport, SmartHubClient, password_digest};

// ── Helpers ─────────────────────────────────────────────────────────

fn host(server: &MockServer) -> String {
    server.uri().trim_start_matches("http://").to_owned()
}

fn transport() -> HttpTransport {
    HttpTransport::with_client(reqwest::Client::new())
}

async fn brightbox() -> (MockServer, BrightBox2Client) {
    let server = MockServer::start().await;
    let client = BrightBox2Client::new(transport(), &host(&server)).unwrap();
    (server, client)
}

async fn smarthub() -> (MockServer, SmartHubClient) {
    let server = MockServer::start().await;
    let client = SmartHubClient::new(transport(), &host(&server)).unwrap();
    (server, client)
}

const STATUS_XML: &str = r#"<?xml version="1.0"?>
<status>
  <deviceDB value="[{mac:'AA:BB:CC:DD:EE:FF',hostname:'laptop',ip:'192.168.1.64',port:'eth0_1'},{mac:'11:22:33:44:55:66',hostname:'phone%20one',ip:'192.168.1.65',port:'ath0'}]"/>
  <ssid_ssid value="'home','guest'"/>
  <ssid_ssidEnable value="'1','0'"/>
  <ssid_security value="'4','2'"/>
  <ssid_wpaPassword value="'s3cret','visitor'"/>
  <ssid_broadcast value="'1','1'"/>
</status>"#;

// ── BrightBox 2 ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_posts_digest_and_extracts_urn() {
    let (server, client) = brightbox().await;
    let digest = password_digest(&SecretString::from("password"));

    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .and(body_string_contains("usr=admin"))
        .and(body_string_contains("pws=5f4dcc3b5aa765d61d8327deb882cf99"))
        .and(body_string_contains("GO=status.htm"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<script>var new_urn = 'tok42';</script>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let urn = client.login("admin", &digest).await.unwrap();
    assert_eq!(urn.as_deref(), Some("tok42"));
}

#[tokio::test]
async fn test_login_without_token_returns_none() {
    let (server, client) = brightbox().await;

    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Invalid password</html>"))
        .mount(&server)
        .await;

    let urn = client.login("admin", "digest").await.unwrap();
    assert!(urn.is_none());
}

#[tokio::test]
async fn test_logout_sends_cookie() {
    let (server, client) = brightbox().await;

    Mock::given(method("POST"))
        .and(path("/logout.cgi"))
        .and(header("cookie", "urn=tok42"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.logout("tok42").await.unwrap();
}

#[tokio::test]
async fn test_known_devices_from_status_document() {
    let (server, client) = brightbox().await;

    Mock::given(method("GET"))
        .and(path("/status_conn.xml"))
        .and(header("cookie", "urn=tok42"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STATUS_XML))
        .mount(&server)
        .await;

    let devices = client.known_devices("tok42").await.unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0]["mac"], "AA:BB:CC:DD:EE:FF");
    assert_eq!(devices[1]["hostname"], "phone one");
    assert_eq!(devices[1]["port"], "ath0");
}

#[tokio::test]
async fn test_ssids_from_status_document() {
    let (server, client) = brightbox().await;

    Mock::given(method("GET"))
        .and(path("/status_conn.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STATUS_XML))
        .mount(&server)
        .await;

    let ssids = client.ssids("tok42").await.unwrap();
    assert_eq!(ssids.len(), 2);
    assert_eq!(ssids[0]["ssid_ssid"], "home");
    assert_eq!(ssids[1]["ssid_wpaPassword"], "visitor");
}

// ── Error paths ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_status_http_error() {
    let (server, client) = brightbox().await;

    Mock::given(method("GET"))
        .and(path("/status_conn.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.known_devices("tok42").await.unwrap_err();
    assert!(matches!(err, Error::Status { status: 500, .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_status_without_device_db() {
    let (server, client) = brightbox().await;

    Mock::given(method("GET"))
        .and(path("/status_conn.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<status><uptime value=\"1\"/></status>"))
        .mount(&server)
        .await;

    let err = client.known_devices("tok42").await.unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::MissingElement(_))));
    assert!(err.is_parse());
}

#[tokio::test]
async fn test_unreachable_router_is_transport_error() {
    let client = BrightBox2Client::new(transport(), "127.0.0.1:1").unwrap();
    let err = client.login("admin", "digest").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

// ── Smart Hub ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_smarthub_known_devices() {
    let (server, client) = smarthub().await;

    let script = "var known_device_list = [\n\
        {mac:'AA%3ABB%3ACC%3ADD%3AEE%3AFF',hostname:'tv',ip:'192.168.1.70',activity:1},\n\
        null\n\
    ];\n";

    Mock::given(method("GET"))
        .and(path("/cgi/cgi_myNetwork.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string(script))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.known_devices().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0]["mac"], "AA:BB:CC:DD:EE:FF");
    assert_eq!(devices[0]["activity"], "1");
}

#[tokio::test]
async fn test_smarthub_missing_list() {
    let (server, client) = smarthub().await;

    Mock::given(method("GET"))
        .and(path("/cgi/cgi_myNetwork.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string("var other = 1;"))
        .mount(&server)
        .await;

    let err = client.known_devices().await.unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::ListNotFound(_))));
}
