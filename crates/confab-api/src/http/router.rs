//! Axum router configuration with middleware.
//!
//! Auth routes sit at the root; everything conversational is scoped under
//! `/users/{user_id}` and requires a bearer token.
//! Middleware: request-body limit, CORS, tracing.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Request-body cap for a given raw upload size.
///
/// Image payloads arrive base64-encoded inside a JSON body, so the raw
/// bytes inflate by 4/3 plus the envelope fields. Without this, axum's
/// stock 2 MB body limit would reject large uploads before the handler's
/// own size validation ever ran.
fn request_body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes.div_ceil(3) * 4 + 64 * 1024
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = DefaultBodyLimit::max(request_body_limit(state.config.uploads.max_bytes));

    Router::new()
        // Accounts
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
        // Chats
        .route(
            "/users/{user_id}/chats",
            get(handlers::chat::list_chats).post(handlers::chat::create_chat),
        )
        .route(
            "/users/{user_id}/chats/{chat_id}",
            axum::routing::delete(handlers::chat::delete_chat),
        )
        // Turns
        .route(
            "/users/{user_id}/chats/{chat_id}/messages",
            get(handlers::chat::get_messages).post(handlers::message::submit_message),
        )
        .route(
            "/users/{user_id}/chats/{chat_id}/images",
            post(handlers::upload::submit_image),
        )
        .route("/health", get(health_check))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    const TEN_MIB: usize = 10 * 1024 * 1024;

    /// Route layered the way `build_router` layers the image endpoint.
    fn limited_router(max_upload_bytes: usize) -> Router {
        Router::new()
            .route(
                "/upload",
                post(|body: String| async move { body.len().to_string() }),
            )
            .layer(DefaultBodyLimit::max(request_body_limit(max_upload_bytes)))
    }

    fn post_body(bytes: usize) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload")
            .body(Body::from("x".repeat(bytes)))
            .unwrap()
    }

    #[test]
    fn test_body_limit_covers_encoded_cap_size_upload() {
        // A cap-sized image grows by 4/3 under base64; the limit must
        // admit that plus the JSON envelope around it.
        let encoded = TEN_MIB.div_ceil(3) * 4;
        assert!(request_body_limit(TEN_MIB) > encoded);
    }

    #[tokio::test]
    async fn test_large_image_body_reaches_the_handler() {
        // 4 MiB is over axum's stock 2 MB default but well under the
        // configured cap; the handler, not the framework, must see it.
        let response = limited_router(TEN_MIB)
            .oneshot(post_body(4 * 1024 * 1024))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_body_over_the_limit_is_rejected() {
        let response = limited_router(TEN_MIB)
            .oneshot(post_body(request_body_limit(TEN_MIB) + 1))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
