#![allow(clippy::unwrap_used)]
// Integration tests for `ProvisioningClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use warpgen_api::{
    Error, KeysMethod, ProvisioningClient, RegisterRequest, RegistrationResponse, ServiceUrls,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn urls(server: &MockServer, keys_method: KeysMethod, client_headers: bool) -> ServiceUrls {
    let base = Url::parse(&server.uri()).unwrap();
    ServiceUrls {
        keys: base.join("/keys").unwrap(),
        keys_method,
        register: base.join("/wg").unwrap(),
        directory: Some(base.join("/endpoints").unwrap()),
        client_headers,
    }
}

async fn setup() -> (MockServer, ProvisioningClient) {
    let server = MockServer::start().await;
    let client =
        ProvisioningClient::with_client(reqwest::Client::new(), urls(&server, KeysMethod::Post, true));
    (server, client)
}

fn sample_request() -> RegisterRequest {
    RegisterRequest {
        key: "PUBKEY".into(),
        install_id: "abcdefghijklmnopqrstuv".into(),
        fcm_token: "abcdefghijklmnopqrstuv:APA91bxyz".into(),
        tos: "2024-01-01T00:00:00.000Z".into(),
        model: "PC".into(),
        serial_number: "abcdefghijklmnopqrstuv".into(),
        locale: "de_DE".into(),
    }
}

// ── Keys ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_keys_text_body_via_post() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/keys"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("PublicKey: PUBKEY\nPrivateKey: PRIVKEY\n"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let keys = client.fetch_keys().await.unwrap();

    assert_eq!(keys.public_key, "PUBKEY");
    assert_eq!(keys.private_key, "PRIVKEY");
}

#[tokio::test]
async fn test_fetch_keys_json_body_via_get() {
    let server = MockServer::start().await;
    let client = ProvisioningClient::with_client(
        reqwest::Client::new(),
        urls(&server, KeysMethod::Get, true),
    );

    Mock::given(method("GET"))
        .and(path("/keys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "publicKey": "PUBKEY",
            "privateKey": "PRIVKEY"
        })))
        .mount(&server)
        .await;

    let keys = client.fetch_keys().await.unwrap();

    assert_eq!(keys.public_key, "PUBKEY");
    assert_eq!(keys.private_key, "PRIVKEY");
}

#[tokio::test]
async fn test_fetch_keys_http_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/keys"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let result = client.fetch_keys().await;

    assert!(
        matches!(result, Err(Error::Status { status: 503, .. })),
        "expected Status error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_keys_unparseable_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/keys"))
        .respond_with(ResponseTemplate::new(200).set_body_string("nothing useful"))
        .mount(&server)
        .await;

    let result = client.fetch_keys().await;

    assert!(
        matches!(result, Err(Error::KeyParse { .. })),
        "expected KeyParse error, got: {result:?}"
    );
}

// ── Registration ────────────────────────────────────────────────────

#[tokio::test]
async fn test_register_sends_identity_and_client_headers() {
    let (server, client) = setup().await;
    let request = sample_request();

    let body = json!({
        "key": "PUBKEY",
        "config": {
            "client_id": "AQID",
            "interface": { "addresses": { "v4": "172.16.0.2", "v6": "fd01::2" } },
            "peers": [{ "public_key": "PEERPUB" }]
        }
    });

    Mock::given(method("POST"))
        .and(path("/wg"))
        .and(header("user-agent", "okhttp/3.12.1"))
        .and(header("cf-client-version", "a-6.10-2158"))
        .and(body_json(json!({
            "key": "PUBKEY",
            "install_id": "abcdefghijklmnopqrstuv",
            "fcm_token": "abcdefghijklmnopqrstuv:APA91bxyz",
            "tos": "2024-01-01T00:00:00.000Z",
            "model": "PC",
            "serial_number": "abcdefghijklmnopqrstuv",
            "locale": "de_DE"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.register_account(&request).await.unwrap();

    let RegistrationResponse::Flat(flat) = resp else {
        panic!("expected flat response");
    };
    assert_eq!(flat.key, "PUBKEY");
    assert_eq!(flat.config.peers[0].public_key, "PEERPUB");
}

#[tokio::test]
async fn test_register_without_client_headers() {
    let server = MockServer::start().await;
    let client = ProvisioningClient::with_client(
        reqwest::Client::new(),
        urls(&server, KeysMethod::Post, false),
    );

    Mock::given(method("POST"))
        .and(path("/wg"))
        .and(header("user-agent", "okhttp/3.12.1"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/wg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "key": "PUBKEY",
                "peer_public_key": "PEERPUB",
                "allowed_ips": ["172.16.0.2/32", "fd01::2/128"],
                "client_id": "AQID"
            }
        })))
        .mount(&server)
        .await;

    let resp = client.register_account(&sample_request()).await.unwrap();

    assert!(matches!(resp, RegistrationResponse::Wrapped(_)));
}

#[tokio::test]
async fn test_register_http_error_keeps_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/wg"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = client.register_account(&sample_request()).await.unwrap_err();

    assert!(err.is_transient());
    match err {
        Error::Status { status, body, .. } => {
            assert_eq!(status, 429);
            assert_eq!(body, "slow down");
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_register_malformed_json() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/wg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let result = client.register_account(&sample_request()).await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

// ── Directory ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_endpoint_directory() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/endpoints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ipv4": ["162.159.192.5:2408", "162.159.195.1:500"],
            "ipv6": ["[2606:4700:d0::a29f:c005]:2408"]
        })))
        .mount(&server)
        .await;

    let list = client.fetch_endpoint_directory().await.unwrap().unwrap();

    assert_eq!(list.ipv4, vec!["162.159.192.5:2408", "162.159.195.1:500"]);
    assert_eq!(list.ipv6, vec!["[2606:4700:d0::a29f:c005]:2408"]);
}

#[tokio::test]
async fn test_fetch_endpoint_directory_unconfigured() {
    let server = MockServer::start().await;
    let mut service = urls(&server, KeysMethod::Post, true);
    service.directory = None;
    let client = ProvisioningClient::with_client(reqwest::Client::new(), service);

    let list = client.fetch_endpoint_directory().await.unwrap();

    assert!(list.is_none());
}

#[tokio::test]
async fn test_fetch_endpoint_directory_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/endpoints"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.fetch_endpoint_directory().await;

    assert!(
        matches!(result, Err(Error::Status { status: 500, .. })),
        "expected Status error, got: {result:?}"
    );
}
