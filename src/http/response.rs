//! HTTP response building module
//!
//! Every builder sets an exact `Content-Length`. HEAD requests get the same
//! head with an empty body.

use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::body::{empty, full, ResponseBody};

const HTML: &str = "text/html; charset=utf-8";

/// Build 200 response around an already opened file body
pub fn build_file_response(
    body: ResponseBody,
    content_type: &str,
    content_length: u64,
) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(empty())
        })
}

/// Build generic HTML response
pub fn build_html_response(
    status: StatusCode,
    content: String,
    is_head: bool,
) -> Response<ResponseBody> {
    let content_length = content.len();
    let body = if is_head {
        empty()
    } else {
        full(Bytes::from(content))
    };

    Response::builder()
        .status(status)
        .header("Content-Type", HTML)
        .header("Content-Length", content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(empty())
        })
}

/// Build 404 response carrying a rendered error page
pub fn build_error_page_response(page: String, is_head: bool) -> Response<ResponseBody> {
    build_html_response(StatusCode::NOT_FOUND, page, is_head)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    const BODY: &str = "405 Method Not Allowed";
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain")
        .header("Content-Length", BODY.len())
        .header("Allow", "GET, HEAD")
        .body(full(BODY))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(full(BODY))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
