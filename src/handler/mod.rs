//! Request handler module
//!
//! The per-request callback: the router validates the method and dispatches to
//! the responder selected at startup.

pub mod pages;
pub mod router;
pub mod static_files;
mod template;

use hyper::{Method, Request, Response, Version};
use std::net::SocketAddr;
use std::time::Duration;

use crate::config::{Config, ResponderMode};
use crate::http::ResponseBody;

// Re-export main entry point
pub use pages::{DiagnosticPage, ErrorPage, FixedPage};
pub use router::handle_request;
pub use static_files::{ServedFile, StaticResponder};

/// What a responder needs to know about an inbound request
///
/// `path` is the raw path component of the request target, not percent-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// "1.0", "1.1" or "2"
    pub http_version: String,
    pub client_addr: SocketAddr,
    pub user_agent: Option<String>,
}

impl RequestInfo {
    pub fn from_request<B>(req: &Request<B>, client_addr: SocketAddr) -> Self {
        let http_version = match req.version() {
            Version::HTTP_09 => "0.9",
            Version::HTTP_10 => "1.0",
            Version::HTTP_2 => "2",
            Version::HTTP_3 => "3",
            _ => "1.1",
        };

        Self {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            http_version: http_version.to_string(),
            client_addr,
            user_agent: req
                .headers()
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
        }
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD.as_str()
    }
}

/// The responder that answers every request of this process
#[derive(Debug, Clone)]
pub enum Responder {
    Fixed(FixedPage),
    Diagnostic(DiagnosticPage),
    Static(StaticResponder),
}

impl Responder {
    /// Build the responder chosen by `server.mode`
    ///
    /// Fails when the static root is missing or the error template file cannot be read.
    pub fn from_config(cfg: &Config) -> std::io::Result<Self> {
        Ok(match cfg.server.mode {
            ResponderMode::Fixed => Self::Fixed(FixedPage::new(cfg.pages.fixed.clone())),
            ResponderMode::Diagnostic => {
                Self::Diagnostic(DiagnosticPage::new(cfg.pages.diagnostic.clone()))
            }
            ResponderMode::Static => Self::Static(
                StaticResponder::new(&cfg.server.root, cfg.error_template()?)?
                    .with_chunk_size(cfg.http.chunk_size)
                    .with_read_timeout(Duration::from_secs(cfg.performance.file_read_timeout)),
            ),
        })
    }

    pub async fn respond(&self, req: &RequestInfo) -> Response<ResponseBody> {
        match self {
            Self::Fixed(page) => page.handle(req),
            Self::Diagnostic(page) => page.handle(req),
            Self::Static(files) => files.handle(req).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_info_from_request() {
        let req = Request::builder()
            .method("GET")
            .uri("/a%20b.html?x=1")
            .version(Version::HTTP_10)
            .header("User-Agent", "test-agent")
            .body(())
            .unwrap();
        let info = RequestInfo::from_request(&req, "10.0.0.2:5555".parse().unwrap());

        assert_eq!(info.path, "/a%20b.html");
        assert_eq!(info.query.as_deref(), Some("x=1"));
        assert_eq!(info.http_version, "1.0");
        assert_eq!(info.user_agent.as_deref(), Some("test-agent"));
        assert_eq!(info.client_addr.port(), 5555);
        assert!(!info.is_head());
    }

    #[test]
    fn test_from_config_selects_mode() {
        let mut cfg = Config::load_from("definitely-missing-config-file").unwrap();

        cfg.server.mode = ResponderMode::Fixed;
        assert!(matches!(Responder::from_config(&cfg), Ok(Responder::Fixed(_))));

        cfg.server.mode = ResponderMode::Diagnostic;
        assert!(matches!(
            Responder::from_config(&cfg),
            Ok(Responder::Diagnostic(_))
        ));

        cfg.server.mode = ResponderMode::Static;
        cfg.server.root = std::env::temp_dir().to_string_lossy().into_owned();
        assert!(matches!(Responder::from_config(&cfg), Ok(Responder::Static(_))));

        cfg.server.root = "/definitely/not/a/root".to_string();
        assert!(Responder::from_config(&cfg).is_err());
    }
}
