#![allow(clippy::unwrap_used)]
// End-to-end retrieval against a mock router over real HTTP.

use std::time::Duration;

use secrecy::SecretString;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eerouter_core::{Router, RouterConfig};

fn host(server: &MockServer) -> String {
    server.uri().trim_start_matches("http://").to_owned()
}

const STATUS_XML: &str = r#"<?xml version="1.0"?>
<status>
  <deviceDB value="[{mac:'AA:BB:CC:DD:EE:FF',hostname:'laptop%20one',port:'eth0_1',ip:'192.168.1.64',ipv6:'',ipv6_ll:'',time_first_seen:'2024/01/02 03:04:05',time_last_active:'2024/05/06 07:08:09',activity:'1',activity_ip:'1',activity_ipv6:'0',activity_ipv6_ll:'0',dhcp_option:'',name:'',os:'Unknown',device:'Unknown',device_oui:'',device_serial:'',device_class:''}]"/>
  <ssid_ssid value="'home'"/>
  <ssid_ssidEnable value="'1'"/>
  <ssid_security value="'4'"/>
  <ssid_wpaPassword value="'s3cret'"/>
  <ssid_broadcast value="'1'"/>
</status>"#;

const NETWORK_SCRIPT: &str = r"
var known_device_list = [
  {mac:'11:11:11:11:11:11,22:22:22:22:22:22',hostname:'phone',port:'ath0,ath1',ip:'192.168.1.90,192.168.1.91',ipv6:'',ipv6_ll:'',time_first_seen:'2024/01/02 03:04:05',time_last_active:'2024/01/02 04:04:05',activity:1,activity_ip:'0,1',activity_ipv6:'0',activity_ipv6_ll:'0',dhcp_option:'',name:'',os:'',device:'',device_oui:'',device_serial:'',device_class:''},
  null
];
";

#[tokio::test]
async fn test_brightbox2_session_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<script>var new_urn = 'e2e';</script>"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status_conn.xml"))
        .and(header("cookie", "urn=e2e"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STATUS_XML))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/logout.cgi"))
        .and(header("cookie", "urn=e2e"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = RouterConfig {
        version: 2,
        host: Some(host(&server)),
        password: Some(SecretString::from("password")),
        timeout: Duration::from_secs(5),
        ..RouterConfig::default()
    };
    let mut router = Router::from_config(&config).unwrap();

    let (devices, ssids) = router
        .with_session(async |r| Ok((r.get_active_devices().await?, r.get_ssids().await?)))
        .await
        .unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].hostname.as_deref(), Some("laptop one"));
    assert_eq!(devices[0].os, None);
    assert_eq!(ssids[0].ssid, "home");
    assert!(ssids[0].enabled);
    assert!(!router.is_authenticated());
}

#[tokio::test]
async fn test_smarthub_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/cgi_myNetwork.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NETWORK_SCRIPT))
        .mount(&server)
        .await;

    let config = RouterConfig {
        version: 3,
        host: Some(host(&server)),
        ..RouterConfig::default()
    };
    let router = Router::from_config(&config).unwrap();

    let devices = router.get_devices().await.unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[1].mac, "22:22:22:22:22:22");
    assert_eq!(devices[1].port.as_deref(), Some("ath1"));

    let active = router.get_active_devices().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].ip.as_deref(), Some("192.168.1.91"));
}

#[tokio::test]
async fn test_unreachable_router_yields_empty_list() {
    let config = RouterConfig {
        version: 3,
        host: Some("127.0.0.1:1".into()),
        timeout: Duration::from_secs(2),
        ..RouterConfig::default()
    };
    let router = Router::from_config(&config).unwrap();
    assert!(router.get_devices().await.unwrap().is_empty());
}
