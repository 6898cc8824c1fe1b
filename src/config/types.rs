// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::fmt;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub pages: PagesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Which responder answers requests
    pub mode: ResponderMode,
    /// Directory below which all servable files must reside
    pub root: String,
}

/// Responder selection
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponderMode {
    /// Constant page for every request
    Fixed,
    /// Page describing the request itself
    Diagnostic,
    /// Files from the server root
    #[default]
    Static,
}

impl fmt::Display for ResponderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Diagnostic => write!(f, "diagnostic"),
            Self::Static => write!(f, "static"),
        }
    }
}

impl std::str::FromStr for ResponderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "diagnostic" => Ok(Self::Diagnostic),
            "static" => Ok(Self::Static),
            other => Err(format!(
                "unknown mode '{other}' (expected fixed, diagnostic or static)"
            )),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Time allowed for the request head to arrive (seconds)
    pub read_timeout: u64,
    /// Longest silence tolerated on a connection once the head is read (seconds)
    pub write_timeout: u64,
    /// Upper bound for a single chunk read from disk (seconds)
    pub file_read_timeout: u64,
    /// How long shutdown waits for open connections to finish (seconds)
    pub shutdown_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    /// Buffer size used when streaming files
    pub chunk_size: usize,
}

/// Page templates handed to the responders
#[derive(Debug, Deserialize, Clone)]
pub struct PagesConfig {
    #[serde(default = "default_fixed_page")]
    pub fixed: String,
    #[serde(default = "default_diagnostic_page")]
    pub diagnostic: String,
    #[serde(default = "default_error_page")]
    pub error: String,
    /// Read the error template from this file instead of `error`
    #[serde(default)]
    pub error_file: Option<String>,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            fixed: default_fixed_page(),
            diagnostic: default_diagnostic_page(),
            error: default_error_page(),
            error_file: None,
        }
    }
}

pub fn default_fixed_page() -> String {
    "<html>\n<body>\n<p>Hello, Web</p>\n</body>\n</html>\n".to_string()
}

pub fn default_diagnostic_page() -> String {
    String::from(
        r"<html>
<head>
<title>Server Test Page</title>
</head>
<body>
<h1>Request details</h1>
<table>
<tr> <td>Header</td>        <td>Value</td> </tr>
<tr> <td>Date and Time</td> <td>{date_time}</td> </tr>
<tr> <td>Client Host</td>   <td>{client_host}</td> </tr>
<tr> <td>Client Port</td>   <td>{client_port}</td> </tr>
<tr> <td>Command</td>       <td>{command}</td> </tr>
<tr> <td>Path</td>          <td>{path}</td> </tr>
</table>
</body>
</html>
",
    )
}

pub fn default_error_page() -> String {
    String::from(
        r"<html>
<body>
<h1>Error accessing {path}</h1>
<p>{msg}</p>
</body>
</html>
",
    )
}
