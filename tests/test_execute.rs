//! Request execution against a mock server

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use wiremock::matchers::{body_string, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reqpad::client::{ClientOptions, HttpClient};
use reqpad::config::Config;
use reqpad::http::HttpMethod;
use reqpad::middleware::auth::{ApiKeyLocation, AuthConfig};
use reqpad::models::{ApiRequest, BodyType, Environment, RequestDescriptor, NETWORK_ERROR_STATUS};
use reqpad::service::RequestService;
use reqpad::store::Store;

fn client() -> HttpClient {
    HttpClient::new(&ClientOptions {
        timeout: Duration::from_secs(2),
        ..ClientOptions::default()
    })
    .unwrap()
}

fn service(config: Config) -> RequestService {
    RequestService::new(Arc::new(Store::in_memory()), client(), config)
}

fn test_config() -> Config {
    Config::with_dir(PathBuf::from("/nonexistent"))
}

// ============================================================================
// HttpClient
// ============================================================================

#[tokio::test]
async fn test_get_records_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Trace", "abc")
                .set_body_string(r#"[{"id":1}]"#),
        )
        .mount(&server)
        .await;

    let request = RequestDescriptor::new(format!("{}/users", server.uri()));
    let record = client().execute(&request, &AuthConfig::None).await.unwrap();

    assert_eq!(record.status_code, 200);
    assert_eq!(record.status_message, "OK");
    assert!(record.is_success());
    assert_eq!(record.body.as_deref(), Some(r#"[{"id":1}]"#));
    assert_eq!(record.response_size, 10);
    assert_eq!(record.headers["x-trace"], "abc");
}

#[tokio::test]
async fn test_query_params_are_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "a b&c"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let request = RequestDescriptor::new(format!("{}/search", server.uri()))
        .with_query_param("q", "a b&c")
        .with_query_param("page", "2");
    let record = client().execute(&request, &AuthConfig::None).await.unwrap();
    assert_eq!(record.status_code, 200);
}

#[tokio::test]
async fn test_basic_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let request = RequestDescriptor::new(server.uri());
    let record = client()
        .execute(&request, &AuthConfig::basic("user", "pass"))
        .await
        .unwrap();
    assert_eq!(record.status_code, 200);
}

#[tokio::test]
async fn test_bearer_overrides_request_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let request = RequestDescriptor::new(server.uri()).with_header("Authorization", "Bearer stale");
    let record = client().execute(&request, &AuthConfig::bearer("fresh")).await.unwrap();
    assert_eq!(record.status_code, 200);
}

#[tokio::test]
async fn test_api_key_in_header_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/h"))
        .and(header("X-API-Key", "k1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/q"))
        .and(query_param("api_key", "k2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let header_auth = AuthConfig::api_key("X-API-Key", "k1", ApiKeyLocation::Header);
    let record = client()
        .execute(&RequestDescriptor::new(format!("{}/h", server.uri())), &header_auth)
        .await
        .unwrap();
    assert_eq!(record.status_code, 200);

    let query_auth = AuthConfig::api_key("api_key", "k2", ApiKeyLocation::QueryParam);
    let record = client()
        .execute(&RequestDescriptor::new(format!("{}/q", server.uri())), &query_auth)
        .await
        .unwrap();
    assert_eq!(record.status_code, 200);
}

#[tokio::test]
async fn test_json_body_gets_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("Content-Type", "application/json"))
        .and(body_string(r#"{"a":1}"#))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let request = RequestDescriptor::new(server.uri())
        .with_method(HttpMethod::Post)
        .with_body(Some(r#"{"a":1}"#.to_string()));
    let record = client().execute(&request, &AuthConfig::None).await.unwrap();
    assert_eq!(record.status_code, 201);
}

#[tokio::test]
async fn test_user_content_type_wins() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(header("Content-Type", "text/plain"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let request = RequestDescriptor::new(server.uri())
        .with_method(HttpMethod::Put)
        .with_header("content-type", "text/plain")
        .with_body(Some(r#"{"a":1}"#.to_string()));
    let record = client()
        .execute_with(&request, BodyType::RawJson, &AuthConfig::None)
        .await
        .unwrap();
    assert_eq!(record.status_code, 204);
    assert!(record.body.is_none());
}

#[tokio::test]
async fn test_get_never_sends_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let request = RequestDescriptor::new(server.uri()).with_body(Some("a=1".to_string()));
    let record = client().execute(&request, &AuthConfig::None).await.unwrap();
    assert_eq!(record.status_code, 200);
}

#[tokio::test]
async fn test_connection_failure_is_an_error() {
    // Port 9 (discard) is closed on test machines
    let request = RequestDescriptor::new("http://127.0.0.1:9/");
    let err = client().execute(&request, &AuthConfig::None).await.unwrap_err();
    assert!(!err.message.is_empty());
}

// ============================================================================
// RequestService
// ============================================================================

#[tokio::test]
async fn test_send_records_and_autosaves() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ping"))
        .and(header("X-Env", "dev"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config();
    config.default_headers.insert("Accept".to_string(), "application/json".to_string());
    let service = service(config);

    let mut vars = IndexMap::new();
    vars.insert("base".to_string(), server.uri());
    vars.insert("env".to_string(), "dev".to_string());
    let env = service.store().create_environment(Environment::new("dev", vars)).unwrap();
    service.store().set_active_environment(&env.id).unwrap();

    let request = ApiRequest::new(
        "ping",
        RequestDescriptor::new("{{base}}/v1/ping").with_header("X-Env", "{{env}}"),
    );
    let record = service.send(&request, &AuthConfig::None).await.unwrap();

    assert_eq!(record.status_code, 200);
    assert_eq!(record.request_id.as_deref(), Some(request.id.as_str()));
    assert_eq!(service.store().responses_for_request(&request.id).len(), 1);

    // Stored with its variables intact, not the substituted values
    let stored = service.store().request(&request.id).unwrap();
    assert_eq!(stored.descriptor.url, "{{base}}/v1/ping");
}

#[tokio::test]
async fn test_send_transport_failure_becomes_record() {
    let mut config = test_config();
    config.auto_save_requests = false;
    let service = service(config);

    let request = ApiRequest::new("dead", RequestDescriptor::new("http://127.0.0.1:9/"));
    let record = service.send(&request, &AuthConfig::None).await.unwrap();

    assert!(record.is_error);
    assert_eq!(record.status_code, 0);
    assert_eq!(record.status_message, NETWORK_ERROR_STATUS);
    assert!(record.error_message.is_some());
    assert_eq!(service.store().list_responses().len(), 1);
    assert!(service.store().request(&request.id).is_none());
}

#[tokio::test]
async fn test_send_imported_curl() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/items"))
        .and(header_exists("x-token"))
        .and(body_string("name=widget"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let service = service(test_config());
    let command = format!("curl -H 'X-Token: t' -d 'name=widget' {}/items", server.uri());
    let request = service.import_curl(&command, None, None, false).unwrap();
    assert_eq!(request.body_type, BodyType::UrlEncoded);

    let record = service.send(&request, &AuthConfig::None).await.unwrap();
    assert_eq!(record.status_code, 201);
    assert_eq!(service.store().list_requests().len(), 1);
}
