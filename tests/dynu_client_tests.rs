use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use dnsdesk::error::ProviderError;
use dnsdesk::provider::{DomainProvider, DomainTarget, DynuClient, ProviderClient};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use url::Url;

const GOOD_KEY: &str = "good-key";

#[derive(Clone, Default)]
struct MockDynu {
    domains: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<Mutex<i64>>,
}

fn authorized(headers: &HeaderMap) -> Result<(), Response> {
    match headers.get("API-Key").and_then(|v| v.to_str().ok()) {
        Some(GOOD_KEY) => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "statusCode": 401,
                "type": "Authentication Exception",
                "message": "Invalid API key."
            })),
        )
            .into_response()),
    }
}

async fn list(State(mock): State<MockDynu>, headers: HeaderMap) -> Response {
    if let Err(resp) = authorized(&headers) {
        return resp;
    }
    let domains = mock.domains.lock().await.clone();
    Json(json!({ "statusCode": 200, "domains": domains })).into_response()
}

async fn add(State(mock): State<MockDynu>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(resp) = authorized(&headers) {
        return resp;
    }
    let name = body["name"].as_str().unwrap_or_default().to_string();
    if name.contains('_') {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "statusCode": 400,
                "type": "Validation Exception",
                "message": "Invalid domain name."
            })),
        )
            .into_response();
    }
    let mut next_id = mock.next_id.lock().await;
    *next_id += 1;
    let domain = json!({ "id": *next_id, "name": name, "state": "Complete" });
    mock.domains.lock().await.push(domain.clone());
    Json(domain).into_response()
}

async fn remove(State(mock): State<MockDynu>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(resp) = authorized(&headers) {
        return resp;
    }
    let mut domains = mock.domains.lock().await;
    let before = domains.len();
    domains.retain(|d| d["id"].as_i64() != Some(id));
    if domains.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "statusCode": 404, "type": "Not Found", "message": "Domain not found." })),
        )
            .into_response();
    }
    Json(json!({ "statusCode": 200 })).into_response()
}

async fn spawn_mock() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock server");
    let addr = listener.local_addr().expect("mock server has no address");
    let app = Router::new()
        .route("/v2/dns", get(list).post(add))
        .route("/v2/dns/{id}", delete(remove))
        .with_state(MockDynu::default());
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    Url::parse(&format!("http://{addr}/v2")).expect("invalid mock url")
}

fn client_for(base: Url) -> DynuClient {
    // Loopback traffic must not go through whatever proxy the environment sets.
    let http = reqwest::Client::builder()
        .no_proxy()
        .connect_timeout(Duration::from_secs(2))
        .timeout(Duration::from_secs(5))
        .build()
        .expect("failed to build http client");
    DynuClient::new(base, http)
}

#[tokio::test]
async fn add_list_and_remove_against_mock() {
    let dynu = client_for(spawn_mock().await);
    let client = ProviderClient::new(Arc::new(dynu), 4);

    let outcome = client
        .add_domains(
            GOOD_KEY,
            &["x.example.com".to_string(), "y.example.com".to_string()],
        )
        .await;
    assert!(outcome.all_succeeded());
    assert_eq!(outcome.succeeded.len(), 2);

    let mut names = client.list_domain_names(GOOD_KEY).await.expect("list");
    names.sort();
    assert_eq!(names, vec!["x.example.com", "y.example.com"]);

    let target = [DomainTarget::Name("x.example.com".to_string())];
    let removed = client.remove_domains(GOOD_KEY, &target).await.expect("remove");
    assert!(removed.succeeded.contains("x.example.com"));

    let again = client.remove_domains(GOOD_KEY, &target).await.expect("remove again");
    assert!(matches!(
        again.failed.get("x.example.com"),
        Some(ProviderError::NotFound(_))
    ));
    assert_eq!(
        client.list_domain_names(GOOD_KEY).await.expect("list"),
        vec!["y.example.com".to_string()]
    );
}

#[tokio::test]
async fn rejected_key_maps_to_authentication() {
    let dynu = client_for(spawn_mock().await);
    let err = dynu.list_domains("bad-key").await.expect_err("must fail");
    assert!(matches!(err, ProviderError::Authentication(ref m) if m == "Invalid API key."));
}

#[tokio::test]
async fn provider_validation_error_is_per_domain() {
    let dynu = client_for(spawn_mock().await);
    let client = ProviderClient::new(Arc::new(dynu), 2);

    let outcome = client
        .add_domains(
            GOOD_KEY,
            &["ok.example.com".to_string(), "bad_name.example.com".to_string()],
        )
        .await;
    assert!(outcome.succeeded.contains("ok.example.com"));
    assert!(matches!(
        outcome.failed.get("bad_name.example.com"),
        Some(ProviderError::Remote { status: 400, message }) if message == "Invalid domain name."
    ));
}

#[tokio::test]
async fn delete_of_unknown_id_is_not_found() {
    let dynu = client_for(spawn_mock().await);
    let err = dynu.delete_domain(GOOD_KEY, 4242).await.expect_err("must fail");
    assert!(matches!(err, ProviderError::NotFound(ref s) if s == "4242"));
}

#[tokio::test]
async fn unreachable_provider_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().expect("no address");
    drop(listener);

    let base = Url::parse(&format!("http://{addr}/v2")).expect("invalid url");
    let err = client_for(base)
        .list_domains(GOOD_KEY)
        .await
        .expect_err("must fail");
    assert!(matches!(err, ProviderError::Network(_)));
}
