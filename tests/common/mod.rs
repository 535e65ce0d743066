#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::Service;

use api_template::api::middleware::install_panic_hook;
use api_template::api::routes::{create_router, with_failure_handling};
use api_template::config::Environment;
use api_template::errors::{ErrorResponder, TracingLogger};

fn responder(environment: &str) -> Arc<ErrorResponder> {
    install_panic_hook();
    Arc::new(ErrorResponder::new(
        Environment::new(environment),
        Arc::new(TracingLogger),
    ))
}

/// The production router
pub fn create_test_app(environment: &str) -> Router {
    create_router(responder(environment))
}

/// Extra routes behind the same failure handling as the production router
pub fn create_test_app_with(environment: &str, routes: Router) -> Router {
    with_failure_handling(routes, responder(environment))
}

// Send a request, with an optional JSON body
pub async fn json_request(
    app: &mut Router,
    method: &str,
    uri: &str,
    payload: Option<Value>,
) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match payload {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.call(request).await.unwrap()
}

// Send a request with a raw body and an optional content type
pub async fn raw_request(
    app: &mut Router,
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: &'static str,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body)).unwrap();

    app.call(request).await.unwrap()
}

/// Check the status and JSON content type, then return the parsed body
pub async fn assert_json_response(response: Response, expected_status: StatusCode) -> Value {
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    assert_eq!(
        status,
        expected_status,
        "Expected status code {}, got {}. Response body: {}",
        expected_status,
        status,
        String::from_utf8_lossy(&body)
    );
    assert!(
        content_type
            .as_deref()
            .is_some_and(|v| v.starts_with("application/json")),
        "Response is not JSON: {content_type:?}"
    );

    serde_json::from_slice(&body).expect("Response JSON is not valid")
}
