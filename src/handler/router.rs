//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, dispatch to the
//! configured responder, and access logging.

use hyper::header::{HeaderValue, CONTENT_LENGTH, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use super::RequestInfo;
use crate::config::AppState;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    client_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let info = RequestInfo::from_request(&req, client_addr);

    let rejected = check_http_method(req.method());
    drop(req);

    let mut response = match rejected {
        Some(resp) => resp,
        None => state.responder.respond(&info).await,
    };

    if let Ok(name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, name);
    }

    if state.config.logging.access_log {
        let entry = access_entry(&info, &response, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Access log entry for a finished response head
///
/// HEAD responses announce the GET length but send nothing, so they log 0 bytes.
fn access_entry(
    info: &RequestInfo,
    response: &Response<ResponseBody>,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::from_request(info);
    entry.status = response.status().as_u16();
    entry.body_bytes = if info.is_head() {
        0
    } else {
        response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    };
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

/// Only retrieval is supported: GET and HEAD
fn check_http_method(method: &Method) -> Option<Response<ResponseBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ResponderMode};
    use crate::handler::Responder;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn state(mode: ResponderMode) -> Arc<AppState> {
        let mut cfg = Config::load_from("definitely-missing-config-file").unwrap();
        cfg.server.mode = mode;
        cfg.logging.access_log = false;
        let responder = Responder::from_config(&cfg).unwrap();
        Arc::new(AppState::with_responder(&cfg, responder))
    }

    fn request(method: Method, path: &str) -> Request<()> {
        Request::builder().method(method).uri(path).body(()).unwrap()
    }

    fn client() -> SocketAddr {
        "127.0.0.1:6000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_post_is_rejected() {
        let resp = handle_request(request(Method::POST, "/"), client(), state(ResponderMode::Fixed))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[SERVER], "hello_web");
    }

    #[tokio::test]
    async fn test_fixed_mode_dispatch() {
        let resp = handle_request(
            request(Method::GET, "/whatever"),
            client(),
            state(ResponderMode::Fixed),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&body).contains("Hello, Web"));
    }

    #[tokio::test]
    async fn test_diagnostic_mode_dispatch() {
        let resp = handle_request(
            request(Method::GET, "/inspect"),
            client(),
            state(ResponderMode::Diagnostic),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("<td>/inspect</td>"));
        assert!(html.contains("<td>6000</td>"));
    }

    #[test]
    fn test_access_entry_counts_sent_bytes() {
        let page = "<p>hi</p>".to_string();
        let get = RequestInfo::from_request(&request(Method::GET, "/index.html"), client());
        let response = http::build_html_response(StatusCode::OK, page.clone(), false);
        let entry = access_entry(&get, &response, Instant::now());
        assert_eq!(entry.status, 200);
        assert_eq!(entry.body_bytes, 9);

        let head = RequestInfo::from_request(&request(Method::HEAD, "/index.html"), client());
        let response = http::build_html_response(StatusCode::OK, page, true);
        assert_eq!(response.headers()[CONTENT_LENGTH], "9");
        let entry = access_entry(&head, &response, Instant::now());
        assert_eq!(entry.method, "HEAD");
        assert_eq!(entry.body_bytes, 0);
    }
}
