use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth, state::AppState, students, todos};

pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(todos::router())
        .merge(auth::protected_router())
        .route_layer(middleware::from_fn_with_state(
            state.keys.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(|| async { "ok" }))
        .merge(auth::router())
        .merge(students::router())
        .merge(protected)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Todo API is running",
        "status": "success",
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use uuid::Uuid;

    use crate::{
        auth::JwtKeys,
        config::JwtConfig,
        testing::{register_and_login, send, send_with_auth_header, test_app},
    };

    #[tokio::test]
    async fn public_routes() {
        let app = test_app();

        let (status, body) = send(&app, Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "message": "Todo API is running", "status": "success" })
        );

        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("ok"));
    }

    #[tokio::test]
    async fn gate_rejects_malformed_headers() {
        let app = test_app();

        for (header, reason) in [
            ("", "authorization header required"),
            ("Bearer", "invalid authorization header format"),
            ("Bearer ", "invalid authorization header format"),
            ("Token abc", "invalid authorization header format"),
            ("Bearer not.a.jwt", "invalid or expired token"),
        ] {
            let (status, body) =
                send_with_auth_header(&app, Method::GET, "/todos", Some(header), None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{header:?}");
            assert_eq!(body["error"], reason, "{header:?}");
        }
    }

    #[tokio::test]
    async fn gate_rejects_foreign_secret() {
        let app = test_app();
        let forged = JwtKeys::new(&JwtConfig {
            secret: "someone-elses-secret".into(),
            ttl_hours: 24,
        })
        .issue(Uuid::new_v4(), "x@example.com")
        .unwrap();

        let (status, body) = send(&app, Method::GET, "/todos", Some(&forged), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid or expired token");
    }

    #[tokio::test]
    async fn gate_rejects_expired_token() {
        let app = test_app();
        let (user_id, _) = register_and_login(&app, "late@example.com", "long-enough").await;

        let state = crate::state::AppState::fake();
        let expired = state
            .keys
            .sign(&json!({
                "user_id": user_id.to_string(),
                "email": "late@example.com",
                "exp": time::OffsetDateTime::now_utc().unix_timestamp() - 5,
            }))
            .unwrap();

        let (status, body) = send(&app, Method::GET, "/todos", Some(&expired), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "token has expired");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = test_app();
        let (status, _) = send(&app, Method::GET, "/nope", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
