//! Page responders
//!
//! A constant page, a page describing the request, and the error page used by
//! the static responder. Templates are handed in at construction.

use chrono::Utc;
use hyper::{Response, StatusCode};

use super::template;
use super::RequestInfo;
use crate::error::ServeError;
use crate::http::{self, ResponseBody};

/// Same HTML for every request
#[derive(Debug, Clone)]
pub struct FixedPage {
    page: String,
}

impl FixedPage {
    pub const fn new(page: String) -> Self {
        Self { page }
    }

    pub fn handle(&self, req: &RequestInfo) -> Response<ResponseBody> {
        http::build_html_response(StatusCode::OK, self.page.clone(), req.is_head())
    }
}

/// Table of request details: time, client address, method and path
///
/// Placeholders: `{date_time}`, `{client_host}`, `{client_port}`, `{command}`, `{path}`.
#[derive(Debug, Clone)]
pub struct DiagnosticPage {
    template: String,
}

impl DiagnosticPage {
    pub const fn new(template: String) -> Self {
        Self { template }
    }

    pub fn render(&self, req: &RequestInfo) -> String {
        let date_time = http_date_now();
        let client_host = req.client_addr.ip().to_string();
        let client_port = req.client_addr.port().to_string();
        template::render(
            &self.template,
            &[
                ("date_time", date_time.as_str()),
                ("client_host", client_host.as_str()),
                ("client_port", client_port.as_str()),
                ("command", req.method.as_str()),
                ("path", req.path.as_str()),
            ],
        )
    }

    pub fn handle(&self, req: &RequestInfo) -> Response<ResponseBody> {
        http::build_html_response(StatusCode::OK, self.render(req), req.is_head())
    }
}

/// HTML page shown for every failed static request
///
/// Placeholders: `{path}` (the request path) and `{msg}` (the failure message).
#[derive(Debug, Clone)]
pub struct ErrorPage {
    template: String,
}

impl ErrorPage {
    pub const fn new(template: String) -> Self {
        Self { template }
    }

    pub fn render(&self, err: &ServeError) -> String {
        let msg = err.to_string();
        template::render(&self.template, &[("path", err.path()), ("msg", msg.as_str())])
    }
}

/// Current time as an HTTP date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
fn http_date_now() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
