//! Access log format module
//!
//! Supports `combined`, `common`, `json`, or a custom pattern with `$variables`.

use chrono::{DateTime, Local};

use crate::handler::RequestInfo;

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One served request, recorded after the response head is built
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    /// Announced body size (`Content-Length`)
    pub body_bytes: u64,
    pub user_agent: Option<String>,
    /// Time spent producing the response head, in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Start an entry for `req`, timestamped now
    pub fn from_request(req: &RequestInfo) -> Self {
        Self {
            remote_addr: req.client_addr.ip().to_string(),
            time: Local::now(),
            method: req.method.clone(),
            path: req.path.clone(),
            query: req.query.clone(),
            http_version: req.http_version.clone(),
            status: 200,
            body_bytes: 0,
            user_agent: req.user_agent.clone(),
            request_time_us: 0,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => format!(
                "{} \"{}\"",
                self.format_common(),
                self.user_agent.as_deref().unwrap_or("-")
            ),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.request_uri(), self.http_version)
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        let user_agent = self
            .user_agent
            .as_ref()
            .map_or_else(|| "null".to_string(), |u| format!("\"{}\"", escape_json(u)));

        format!(
            r#"{{"remote_addr":"{}","time":"{}","method":"{}","uri":"{}","http_version":"{}","status":{},"body_bytes":{},"user_agent":{},"request_time_us":{}}}"#,
            escape_json(&self.remote_addr),
            self.time.to_rfc3339(),
            escape_json(&self.method),
            escape_json(&self.request_uri()),
            escape_json(&self.http_version),
            self.status,
            self.body_bytes,
            user_agent,
            self.request_time_us,
        )
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables: `$remote_addr`, `$time_local`, `$time_iso8601`,
    /// `$request`, `$request_method`, `$request_uri`, `$request_time`,
    /// `$status`, `$body_bytes_sent`, `$http_user_agent`.
    ///
    /// The pattern is scanned once, so values that happen to contain `$name`
    /// text (a request path, a user agent) are copied as they are.
    fn format_custom(&self, pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len() + 64);
        let mut rest = pattern;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            match CUSTOM_VARIABLES.iter().find(|name| after.starts_with(**name)) {
                Some(name) => {
                    out.push_str(&self.variable(name));
                    rest = &after[name.len()..];
                }
                None => {
                    out.push('$');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }

    fn variable(&self, name: &str) -> String {
        match name {
            "remote_addr" => self.remote_addr.clone(),
            "time_local" => self.time.format(CLF_TIME).to_string(),
            "time_iso8601" => self.time.to_rfc3339(),
            "request_time" => {
                #[allow(clippy::cast_precision_loss)]
                let secs = self.request_time_us as f64 / 1_000_000.0;
                format!("{secs:.3}")
            }
            "request_method" => self.method.clone(),
            "request_uri" => self.request_uri(),
            "request" => self.request_line(),
            "status" => self.status.to_string(),
            "body_bytes_sent" => self.body_bytes.to_string(),
            "http_user_agent" => self.user_agent.as_deref().unwrap_or("-").to_string(),
            _ => String::new(),
        }
    }
}

/// Custom format variables, longest first so `$request_uri` wins over `$request`
const CUSTOM_VARIABLES: [&str; 10] = [
    "http_user_agent",
    "body_bytes_sent",
    "request_method",
    "time_iso8601",
    "request_time",
    "remote_addr",
    "request_uri",
    "time_local",
    "request",
    "status",
];

/// Escape special characters for JSON string
fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
