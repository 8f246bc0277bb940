//! Function router - turns HTTP requests into function invocations
//!
//! Every method on the function route reaches the function, so methods it
//! does not support still get a JSON envelope instead of a bare 405.

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use uuid::Uuid;

use user_function_sdk::{Envelope, HandlerError, Request as FunctionRequest, StoreError};

use crate::AppState;

/// Create the router serving the function route and the health check
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(&state.config.route, any(handle_function_request))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Invoke the function with the request's method and body
async fn handle_function_request(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let status = rejection.status();
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                status = %status,
                "Failed to read body: {}",
                rejection.body_text()
            );
            return (status, axum::Json(Envelope::failure("Unsuccessful"))).into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        body_len = body.len(),
        "Incoming request"
    );

    let fn_request =
        FunctionRequest::from_bytes(method.as_str(), &body).with_request_id(&request_id);

    // Statements block on SQLite, keep them off the async workers
    let task_state = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        task_state.function.handle(&fn_request, task_state.store.as_ref())
    })
    .await;

    let fn_response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, "Function task failed: {}", e);
            HandlerError::Database(StoreError::Unavailable(e.to_string())).to_response()
        }
    };

    let mut builder = Response::builder()
        .status(StatusCode::from_u16(fn_response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));

    for (key, value) in &fn_response.headers {
        builder = builder.header(key, value);
    }
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        builder = builder.header("X-Request-Id", value);
    }

    match builder.body(Body::from(fn_response.body.unwrap_or_default())) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, "Failed to build response: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(Envelope::failure("Unsuccessful")),
            )
                .into_response()
        }
    }
}
