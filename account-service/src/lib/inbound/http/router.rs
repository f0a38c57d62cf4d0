use std::sync::Arc;
use std::time::Duration;

use auth::AuthGate;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::change_password::change_password;
use super::handlers::get_profile::get_profile;
use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::signup::signup;
use super::middleware::require_identity;
use crate::account::ports::AccountServicePort;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServicePort>,
    pub auth_gate: AuthGate,
}

pub fn create_router(account_service: Arc<dyn AccountServicePort>, auth_gate: AuthGate) -> Router {
    let state = AppState {
        account_service,
        auth_gate,
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/signup", post(signup))
        .route("/api/login", post(login))
        .route("/api/auth/logout", post(logout));

    let protected_routes = Router::new()
        .route("/api/profile", get(get_profile))
        .route("/api/changepassword", post(change_password))
        // Path used by the web client
        .route("/api/change-password", post(change_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_identity,
        ));

    // Headers are deliberately not recorded: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use auth::PasswordHasher;
    use auth::TokenService;
    use axum::http::header::AUTHORIZATION;
    use axum::http::StatusCode;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::account::service::AccountService;
    use crate::outbound::repositories::InMemoryUserStore;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    fn router() -> (Router, Arc<TokenService>) {
        let tokens = Arc::new(TokenService::new(SECRET, chrono::Duration::hours(1)));
        let service = AccountService::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(PasswordHasher::with_params(1024, 1, 1).unwrap()),
            Arc::clone(&tokens),
        )
        .unwrap();
        (
            create_router(Arc::new(service), AuthGate::new(Arc::clone(&tokens))),
            tokens,
        )
    }

    async fn call(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn profile_request(authorization: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri("/api/profile");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_gate_rejections_are_uniform() {
        let (router, _) = router();
        let expired = TokenService::new(SECRET, chrono::Duration::seconds(-1))
            .issue("a@x.com")
            .unwrap()
            .access_token;
        let foreign = TokenService::new(
            b"some-other-secret-key-that-is-32-bytes-long",
            chrono::Duration::hours(1),
        )
        .issue("a@x.com")
        .unwrap()
        .access_token;

        let attempts = [
            None,
            Some("Token abc".to_string()),
            Some("Bearer not.a.jwt".to_string()),
            Some(format!("Bearer {}", expired)),
            Some(format!("Bearer {}", foreign)),
        ];

        let mut bodies = Vec::new();
        for authorization in attempts {
            let (status, body) = call(router.clone(), profile_request(authorization)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            bodies.push(body);
        }

        assert!(bodies.iter().all(|body| body == &bodies[0]));
        assert_eq!(bodies[0]["success"], false);
    }

    #[tokio::test]
    async fn test_valid_token_for_missing_account_is_not_found() {
        let (router, tokens) = router();
        let token = tokens.issue("ghost@x.com").unwrap().access_token;

        let (status, body) = call(router, profile_request(Some(format!("Bearer {}", token)))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_unparseable_body_is_structured_bad_request() {
        let (router, _) = router();
        let request = Request::builder()
            .method("POST")
            .uri("/api/login")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = call(router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = router();
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let (status, body) = call(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
