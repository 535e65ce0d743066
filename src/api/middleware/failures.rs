use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::any::Any;
use std::cell::RefCell;
use std::sync::{Arc, Once};

use crate::errors::{ErrorResponder, Failure};
use crate::metrics::ERROR_RESPONSES_TOTAL;

/// Largest framework error body read back as a failure message
const MAX_PLAIN_BODY_BYTES: usize = 64 * 1024;

thread_local! {
    // Location of the last panic on this thread, taken by the panic catcher
    static PANIC_LOCATION: RefCell<Option<(String, u32)>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Replace error responses with the responder's JSON rendering.
///
/// Responses carrying a `Failure` are rendered from it. Any other 4xx/5xx
/// response that is not already JSON (axum's 405, extractor rejections)
/// becomes an HTTP failure with the same status, keeping its `Allow` header.
pub async fn respond_to_failures(
    State(responder): State<Arc<ErrorResponder>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let (failure, allow) = match response.extensions_mut().remove::<Failure>() {
        Some(failure) => (failure, None),
        None if is_plain_error(&response) => {
            let allow = response.headers().get(header::ALLOW).cloned();
            (failure_from_plain_response(response).await, allow)
        }
        None => return response,
    };

    ERROR_RESPONSES_TOTAL
        .with_label_values(&[failure.kind().as_str()])
        .inc();

    let mut rendered = responder.render(failure);
    if let Some(allow) = allow {
        rendered.headers_mut().insert(header::ALLOW, allow);
    }
    rendered
}

fn is_plain_error(response: &Response) -> bool {
    let status = response.status();
    (status.is_client_error() || status.is_server_error()) && !is_json(response.headers())
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// The body text becomes the message; empty bodies use the status reason
async fn failure_from_plain_response(response: Response) -> Failure {
    let status = response.status();
    let text = match axum::body::to_bytes(response.into_body(), MAX_PLAIN_BODY_BYTES).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(_) => String::new(),
    };

    let message = if text.is_empty() {
        status.canonical_reason().unwrap_or("Error").to_string()
    } else {
        text
    };

    Failure::http(status, message)
}

/// Install a panic hook that records each panic's location for
/// [`failure_from_panic`]. The previous hook still runs. Safe to call more
/// than once.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if let Some(location) = info.location() {
                PANIC_LOCATION.with(|slot| {
                    *slot.borrow_mut() = Some((location.file().to_string(), location.line()));
                });
            }
            previous(info);
        }));
    });
}

fn take_panic_location() -> Option<(String, u32)> {
    PANIC_LOCATION.with(|slot| slot.borrow_mut().take())
}

/// Panic handler for `CatchPanicLayer`; the panic continues as an
/// unclassified failure.
///
/// The failure points at the panic site when [`install_panic_hook`] ran on
/// startup, otherwise at this handler.
pub fn failure_from_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let failure = Failure::from_panic(payload);
    let failure = match take_panic_location() {
        Some((file, line)) => failure.located_at(file, line),
        None => failure,
    };
    failure.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    #[test]
    fn test_panic_becomes_unclassified_failure() {
        let response = failure_from_panic(Box::new("worker crashed"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let failure = response.extensions().get::<Failure>().unwrap();
        assert_eq!(failure.to_string(), "worker crashed");
        assert_eq!(failure.origin().unwrap().class(), "panic");
    }

    #[test]
    fn test_panic_location_is_recorded_by_hook() {
        install_panic_hook();

        #[rustfmt::skip]
        let (payload, line) = (std::panic::catch_unwind(|| panic!("located")).unwrap_err(), line!());
        let response = failure_from_panic(payload);

        let origin = response
            .extensions()
            .get::<Failure>()
            .and_then(Failure::origin)
            .unwrap();
        assert_eq!(origin.file(), file!());
        assert_eq!(origin.line(), line);
    }

    #[test]
    fn test_json_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        assert!(!is_json(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(is_json(&headers));
    }

    #[tokio::test]
    async fn test_empty_plain_response_uses_status_reason() {
        let failure = failure_from_plain_response(StatusCode::METHOD_NOT_ALLOWED.into_response()).await;
        assert_eq!(failure.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(failure.to_string(), "Method Not Allowed");
    }

    #[tokio::test]
    async fn test_plain_response_body_becomes_message() {
        let response = (StatusCode::BAD_REQUEST, "Invalid URL: bad id").into_response();
        let failure = failure_from_plain_response(response).await;
        assert_eq!(failure.status(), StatusCode::BAD_REQUEST);
        assert_eq!(failure.to_string(), "Invalid URL: bad id");
    }
}
