//! HTTP router assembly

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::middleware::{auth_gate, logging_middleware, make_request_span};
use super::state::AppState;
use super::{health, posts, users};

/// Create the full router with application state
///
/// Reads are public; every create, update and delete except registration
/// passes through the auth gate.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(users::protected_routes())
        .merge(posts::protected_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_gate));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .merge(users::public_routes())
        .merge(posts::public_routes())
        .merge(protected)
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::infrastructure::auth::{mint_token, JwtVerifier};
    use crate::infrastructure::post::InMemoryPostRepository;
    use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository};

    const SECRET: &str = "router-secret";

    fn test_app() -> Router {
        let state = crate::build_state(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(Argon2Hasher::with_params(1024, 1, 1).unwrap()),
            Arc::new(JwtVerifier::new(SECRET)),
        );
        create_router(state)
    }

    fn token_for(user_id: u64) -> String {
        mint_token(SECRET, user_id as u32, 3600)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    async fn register(app: &Router, nickname: &str, email: &str) -> u64 {
        let (status, body) = send(
            app,
            Method::POST,
            "/users",
            None,
            Some(json!({"nickname": nickname, "email": email, "password": "secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_u64().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();

        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = send(&app, Method::GET, "/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_hides_password() {
        let app = test_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/users",
            None,
            Some(json!({"nickname": " alice ", "email": "a@x.com", "password": "secret"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["nickname"], "alice");
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());
        assert!(!body.to_string().contains("argon2"));
    }

    #[tokio::test]
    async fn test_register_validation_errors() {
        let app = test_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/users",
            None,
            Some(json!({"nickname": "alice", "email": "not-an-email", "password": "secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["message"], "invalid Email");

        let (status, body) = send(
            &app,
            Method::POST,
            "/users",
            None,
            Some(json!({"nickname": "  ", "email": "a@x.com", "password": "secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["message"], "required Nickname");
    }

    #[tokio::test]
    async fn test_register_duplicate_is_unprocessable() {
        let app = test_app();
        register(&app, "alice", "a@x.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/users",
            None,
            Some(json!({"nickname": "alice", "email": "b@x.com", "password": "secret"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["type"], "conflict_error");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = test_app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"nickname\": "))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let app = test_app();

        let (status, _) = send(&app, Method::GET, "/users/99", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, "/posts/abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::GET, "/posts/0", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_gate_rejects_without_token() {
        let app = test_app();
        let alice = register(&app, "alice", "a@x.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/posts",
            None,
            Some(json!({"title": "Hi", "content": "World", "author_id": alice})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Unauthorized");

        let (status, _) = send(
            &app,
            Method::POST,
            "/posts",
            Some("not-a-token"),
            Some(json!({"title": "Hi", "content": "World", "author_id": alice})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let expired = mint_token(SECRET, alice as u32, -3600);
        let (status, _) = send(&app, Method::DELETE, "/posts/1", Some(&expired), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_post_lifecycle() {
        let app = test_app();
        let alice = register(&app, "alice", "a@x.com").await;
        let bob = register(&app, "bob", "b@x.com").await;
        let alice_token = token_for(alice);
        let bob_token = token_for(bob);

        let (status, created) = send(
            &app,
            Method::POST,
            "/posts",
            Some(&alice_token),
            Some(json!({"title": "Hi", "content": "World", "author_id": alice})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["author"]["nickname"], "alice");
        assert_eq!(created["author_id"], alice);
        let post_id = created["id"].as_u64().unwrap();
        let uri = format!("/posts/{}", post_id);

        let (status, updated) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&alice_token),
            Some(json!({"title": "Hi", "content": "World2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["content"], "World2");
        assert_eq!(updated["created_at"], created["created_at"]);

        let (status, _) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&bob_token),
            Some(json!({"title": "Hi", "content": "hijacked"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&bob_token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, found) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["content"], "World2");

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&alice_token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cannot_post_as_someone_else() {
        let app = test_app();
        let alice = register(&app, "alice", "a@x.com").await;
        let bob = register(&app, "bob", "b@x.com").await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/posts",
            Some(&token_for(bob)),
            Some(json!({"title": "Hi", "content": "World", "author_id": alice})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, listed) = send(&app, Method::GET, "/posts", None, None).await;
        assert_eq!(listed.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_post_for_missing_author() {
        let app = test_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/posts",
            Some(&token_for(42)),
            Some(json!({"title": "Hi", "content": "World", "author_id": 42})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["message"], "author not found");
    }

    #[tokio::test]
    async fn test_token_query_parameter() {
        let app = test_app();
        let alice = register(&app, "alice", "a@x.com").await;

        let uri = format!("/posts?token={}", token_for(alice));
        let (status, _) = send(
            &app,
            Method::POST,
            &uri,
            None,
            Some(json!({"title": "Hi", "content": "World", "author_id": alice})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_user_update_requires_self() {
        let app = test_app();
        let alice = register(&app, "alice", "a@x.com").await;
        let bob = register(&app, "bob", "b@x.com").await;
        let uri = format!("/users/{}", alice);

        let (status, _) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&token_for(bob)),
            Some(json!({"nickname": "mallory"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::PUT, &uri, Some(&token_for(alice)), Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&token_for(alice)),
            Some(json!({"nickname": "alice2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nickname"], "alice2");
        assert_eq!(body["email"], "a@x.com");
    }

    #[tokio::test]
    async fn test_delete_user_removes_posts() {
        let app = test_app();
        let alice = register(&app, "alice", "a@x.com").await;
        let bob = register(&app, "bob", "b@x.com").await;

        for (author, title) in [(alice, "one"), (bob, "two")] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/posts",
                Some(&token_for(author)),
                Some(json!({"title": title, "content": "body", "author_id": author})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let uri = format!("/users/{}", alice);
        let (status, _) = send(&app, Method::DELETE, &uri, Some(&token_for(bob)), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&token_for(alice)), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, listed) = send(&app, Method::GET, "/posts", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["two"]);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_query_token_stays_out_of_logs() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = test_app();
        let token = token_for(1);
        let uri = format!("/posts/1?token={}", token);

        let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("path=/posts/1"));
        assert!(!output.contains(&token));
        assert!(!output.contains("token="));
    }
}
