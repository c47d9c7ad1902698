use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use audiobook_gateway::{
    bootstrap_admin,
    config::Config,
    create_app,
    errors::{AppError, Result, QUERY_BLOCKED_MESSAGE},
    handlers::AppState,
    models::{QueryOutput, StatementKind},
    store::{Backend, CredentialStore, MemoryCredentialStore, QueryEngine},
};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const PASSWORD: &str = "listen2books";
const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-pass-1";

struct StubEngine;

#[async_trait]
impl QueryEngine for StubEngine {
    async fn run(&self, sql: &str, kind: StatementKind) -> Result<QueryOutput> {
        if sql.contains("missing_table") {
            return Err(AppError::QueryFailed("relation \"missing_table\" does not exist".into()));
        }
        Ok(match kind {
            StatementKind::Select => QueryOutput::Rows(vec![json!({"name": "Ana Florence"})]),
            StatementKind::Insert => QueryOutput::Written { rows_affected: 1 },
        })
    }
}

struct TestApp {
    router: Router,
    store: Arc<MemoryCredentialStore>,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    async fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let mut config = Config::for_development();
        config.admin_email = Some(ADMIN_EMAIL.to_string());
        config.admin_password = Some(ADMIN_PASSWORD.to_string());
        adjust(&mut config);

        let store = Arc::new(MemoryCredentialStore::new());
        let backend = Backend {
            credentials: store.clone(),
            queries: Arc::new(StubEngine),
        };
        let state = AppState::new(config, backend).unwrap();
        bootstrap_admin(&state).await.unwrap();

        Self {
            router: create_app(state),
            store,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, headers, body)
    }

    async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn signup(&self, email: &str) -> String {
        let (status, _, body) = self
            .post_json("/api/auth/signup", None, json!({"email": email, "password": PASSWORD}))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["token"].as_str().unwrap().to_string()
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let (status, _, body) = self
            .post_json("/api/auth/login", None, json!({"email": email, "password": password}))
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["token"].as_str().unwrap().to_string()
    }

    async fn calls_used(&self, email: &str) -> i32 {
        self.store
            .find_by_email(email)
            .await
            .unwrap()
            .unwrap()
            .api_calls_used
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let (status, _, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _, body) = app.get("/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_signup_sets_cookie_and_returns_user() {
    let app = TestApp::new().await;

    let (status, headers, body) = app
        .post_json(
            "/api/auth/signup",
            None,
            json!({"email": "  Reader@Example.com ", "password": PASSWORD}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "reader@example.com");
    assert_eq!(body["user"]["role"], "standard");
    assert_eq!(body["user"]["apiCallsUsed"], 0);
    assert_eq!(body["user"]["apiCallsLimit"], 20);
    assert_eq!(body["user"]["apiLimitExceeded"], false);
    assert!(body["user"].get("passwordHash").is_none());

    let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    let token = body["token"].as_str().unwrap();
    assert!(cookie.contains(&format!("token={}", token)));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=604800"));
    assert!(cookie.contains("SameSite=Lax"));
}

#[tokio::test]
async fn test_register_alias_and_duplicate_email() {
    let app = TestApp::new().await;

    let (status, _, _) = app
        .post_json("/api/auth/register", None, json!({"email": "dup@example.com", "password": PASSWORD}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, body) = app
        .post_json("/api/auth/signup", None, json!({"email": "DUP@example.com", "password": PASSWORD}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already exists");
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_signup_validation() {
    let app = TestApp::new().await;

    let (status, _, body) = app.post_json("/api/auth/signup", None, json!({"email": "a@example.com"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email and password are required");

    let (status, _, _) = app
        .post_json("/api/auth/signup", None, json!({"email": "a@example.com", "password": "short"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = app
        .post_json("/api/auth/signup", None, json!({"email": "not-an-email", "password": PASSWORD}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/auth/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_wrong_password_twice_does_not_touch_usage() {
    let app = TestApp::new().await;
    app.signup("reader@example.com").await;

    for _ in 0..2 {
        let (status, headers, body) = app
            .post_json(
                "/api/auth/login",
                None,
                json!({"email": "reader@example.com", "password": "wrong-password-1"}),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid email or password");
        assert!(headers.get(header::SET_COOKIE).is_none());
    }

    let (status, _, _) = app
        .post_json("/api/auth/login", None, json!({"email": "ghost@example.com", "password": PASSWORD}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.calls_used("reader@example.com").await, 0);
}

#[tokio::test]
async fn test_login_and_me() {
    let app = TestApp::new().await;
    app.signup("reader@example.com").await;

    let token = app.login("READER@example.com", PASSWORD).await;

    let (status, _, body) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "reader@example.com");
    assert!(!body["user"]["lastLoginAt"].is_null());
    assert_eq!(app.calls_used("reader@example.com").await, 0);
}

#[tokio::test]
async fn test_me_requires_authentication() {
    let app = TestApp::new().await;

    let (status, _, body) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"success": false, "message": "Authentication failed", "status": 401}));

    let (status, _, _) = app.get("/api/auth/me", Some("not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cookie_token_wins_over_bearer() {
    let app = TestApp::new().await;
    let cookie_token = app.signup("cookie@example.com").await;
    let header_token = app.signup("header@example.com").await;

    let (status, _, body) = app
        .send(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, format!("token={}", cookie_token))
                .header(header::AUTHORIZATION, format!("Bearer {}", header_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "cookie@example.com");

    let (status, _, _) = app
        .send(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, "token=garbage")
                .header(header::AUTHORIZATION, format!("Bearer {}", header_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let app = TestApp::new().await;

    let (status, headers, body) = app.post_json("/api/auth/logout", None, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let app = TestApp::new().await;
    let user_token = app.signup("reader@example.com").await;

    let (status, _, body) = app.get("/api/admin/users", Some(&user_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access forbidden");

    let (status, _, _) = app.get("/api/admin/users", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin_token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, _, body) = app.get("/api/admin/users", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    let emails: Vec<&str> = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert!(emails.contains(&"reader@example.com"));
}

#[tokio::test]
async fn test_deleted_user_token_is_rejected() {
    let app = TestApp::new().await;
    let user_token = app.signup("reader@example.com").await;
    let user_id = app
        .store
        .find_by_email("reader@example.com")
        .await
        .unwrap()
        .unwrap()
        .id;
    let admin_token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, _, _) = app
        .send(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/users/{}", user_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", admin_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = app.get("/api/auth/me", Some(&user_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = app
        .post_json("/api/v1/sql", Some(&user_token), json!({"query": "SELECT 1"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = app
        .send(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/users/{}", user_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", admin_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_user_id_gets_json_envelope() {
    let app = TestApp::new().await;
    let admin_token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, _, body) = app
        .send(
            Request::builder()
                .method("DELETE")
                .uri("/api/admin/users/not-a-uuid")
                .header(header::AUTHORIZATION, format!("Bearer {}", admin_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 400);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid path parameter"));
}

#[tokio::test]
async fn test_select_is_metered() {
    let app = TestApp::new().await;
    let token = app.signup("reader@example.com").await;

    let (status, _, body) = app
        .post_json("/api/v1/sql", Some(&token), json!({"query": "SELECT name FROM voice"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([{"name": "Ana Florence"}]));
    assert_eq!(body["apiLimitExceeded"], false);
    assert_eq!(body["usage"], json!({"used": 1, "limit": 20, "remaining": 19}));

    let (status, _, body) = app
        .get("/api/v1/sql/SELECT%20name%20FROM%20voice", Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usage"]["used"], 2);

    let (status, _, body) = app
        .post_json(
            "/api/v1/sql",
            Some(&token),
            json!({"query": "INSERT INTO language (language_name, language_code) VALUES ('Welsh', 'cy')"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rowsAffected"], 1);

    assert_eq!(app.calls_used("reader@example.com").await, 3);
    assert_eq!(app.store.usage_log().await.len(), 3);
}

#[tokio::test]
async fn test_blocked_query_is_rejected_but_counted() {
    let app = TestApp::new().await;
    let token = app.signup("reader@example.com").await;

    let (status, _, body) = app
        .post_json("/api/v1/sql", Some(&token), json!({"query": "select * from t; DELETE FROM t"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], QUERY_BLOCKED_MESSAGE);
    assert!(!body["message"].as_str().unwrap().contains("DELETE"));
    assert_eq!(body["usage"]["used"], 1);

    let (status, _, body) = app
        .post_json("/api/v1/sql", Some(&token), json!({"query": "SELECT * FROM missing_table"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Database error occurred");

    assert_eq!(app.calls_used("reader@example.com").await, 2);
}

#[tokio::test]
async fn test_missing_query_is_not_metered() {
    let app = TestApp::new().await;
    let token = app.signup("reader@example.com").await;

    let (status, _, body) = app.post_json("/api/v1/sql", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Query is required");
    assert!(body.get("usage").is_none());

    assert_eq!(app.calls_used("reader@example.com").await, 0);
}

#[tokio::test]
async fn test_quota_is_soft() {
    let app = TestApp::with_config(|config| config.default_api_calls_limit = 2).await;
    let token = app.signup("reader@example.com").await;

    let mut last = Value::Null;
    for _ in 0..3 {
        let (status, _, body) = app
            .post_json("/api/v1/sql", Some(&token), json!({"query": "SELECT 1"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        last = body;
    }

    assert_eq!(last["data"], json!([{"name": "Ana Florence"}]));
    assert_eq!(last["apiLimitExceeded"], true);
    assert_eq!(last["usage"], json!({"used": 3, "limit": 2, "remaining": 0}));

    let (_, _, body) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(body["user"]["apiLimitExceeded"], true);
    assert_eq!(body["user"]["freeCallsRemaining"], 0);
}

#[tokio::test]
async fn test_concurrent_calls_are_all_counted() {
    let app = TestApp::new().await;
    let busy = app.signup("busy@example.com").await;
    let other = app.signup("other@example.com").await;

    let requests = (0..30).map(|i| {
        let token = if i % 3 == 0 { other.clone() } else { busy.clone() };
        let router = app.router.clone();
        async move {
            let request = Request::builder()
                .method("POST")
                .uri("/api/v1/sql")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(json!({"query": "SELECT 1"}).to_string()))
                .unwrap();
            router.oneshot(request).await.unwrap().status()
        }
    });

    let statuses = futures::future::join_all(requests).await;
    assert!(statuses.iter().all(|s| *s == StatusCode::OK));

    assert_eq!(app.calls_used("busy@example.com").await, 20);
    assert_eq!(app.calls_used("other@example.com").await, 10);
    assert_eq!(app.store.usage_log().await.len(), 30);
}

#[tokio::test]
async fn test_speech_synthesis_is_metered() {
    let tts = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tts/synthesize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "format": "wav",
            "sample_rate": 24000,
            "audio_base64": "UklGRiQAAABXQVZF",
            "duration_seconds": 0.5
        })))
        .expect(1)
        .mount(&tts)
        .await;

    let uri = tts.uri();
    let app = TestApp::with_config(|config| config.tts_service_url = uri).await;
    let token = app.signup("reader@example.com").await;

    let (status, _, body) = app
        .post_json(
            "/api/tts/synthesize",
            Some(&token),
            json!({"text": "Chapter one.", "language": "en", "speakerId": "ana"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["audioBase64"], "UklGRiQAAABXQVZF");
    assert_eq!(body["sampleRate"], 24000);
    assert_eq!(body["usage"]["used"], 1);

    let (status, _, _) = app
        .post_json("/api/tts/synthesize", Some(&token), json!({"text": "x".repeat(801)}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.calls_used("reader@example.com").await, 1);
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway_and_metered() {
    let textgen = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&textgen)
        .await;

    let uri = textgen.uri();
    let app = TestApp::with_config(|config| config.textgen_service_url = uri).await;
    let token = app.signup("reader@example.com").await;

    let (status, _, body) = app
        .post_json("/api/ai/generate", Some(&token), json!({"prompt": "Tell a story"}))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Upstream service error");
    assert_eq!(body["usage"]["used"], 1);

    let (status, _, _) = app
        .post_json("/api/ai/generate", Some(&token), json!({"prompt": "   "}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.calls_used("reader@example.com").await, 1);
}

#[tokio::test]
async fn test_text_generation() {
    let textgen = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "generated_text": "Once upon a time",
            "model": "tiny-llm"
        })))
        .mount(&textgen)
        .await;

    let uri = textgen.uri();
    let app = TestApp::with_config(|config| config.textgen_service_url = uri).await;
    let token = app.signup("reader@example.com").await;

    let (status, _, body) = app
        .post_json("/api/ai/generate", Some(&token), json!({"prompt": "Tell a story"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["generatedText"], "Once upon a time");
    assert_eq!(body["model"], "tiny-llm");
    assert_eq!(body["apiLimitExceeded"], false);
}

#[tokio::test]
async fn test_disconnected_client_is_still_counted() {
    let textgen = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"generated_text": "Once upon a time", "model": "tiny-llm"}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&textgen)
        .await;

    let uri = textgen.uri();
    let app = TestApp::with_config(|config| config.textgen_service_url = uri).await;
    let token = app.signup("reader@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/ai/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(json!({"prompt": "Tell a story"}).to_string()))
        .unwrap();
    let abandoned = tokio::time::timeout(Duration::from_millis(50), app.router.clone().oneshot(request)).await;
    assert!(abandoned.is_err());

    tokio::time::sleep(Duration::from_millis(500)).await;

    let received = textgen.received_requests().await.unwrap().len();
    assert_eq!(received, 1);
    assert_eq!(app.calls_used("reader@example.com").await as usize, received);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = TestApp::new().await;
    let token = app.signup("reader@example.com").await;
    app.post_json("/api/v1/sql", Some(&token), json!({"query": "DROP TABLE users"}))
        .await;

    let (status, headers, body) = app.get("/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));

    let text = body.as_str().unwrap();
    assert!(text.contains("metered_calls_total{endpoint=\"/api/v1/sql\"} 1"));
    assert!(text.contains("queries_rejected_total 1"));
    assert!(text.contains("http_requests_total"));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::new().await;

    let (status, _, body) = app.get("/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/api/auth/login").is_some());
}

#[tokio::test]
async fn test_cors_mirrors_origin_with_credentials() {
    let app = TestApp::new().await;

    let (status, headers, _) = app
        .send(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/auth/login")
                .header(header::ORIGIN, "https://reader.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert!(status.is_success());
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://reader.example.com"
    );
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(), "true");
}
