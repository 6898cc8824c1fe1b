// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

use crate::cli::Cli;

// Re-export public types
pub use state::AppState;
pub use types::{
    default_diagnostic_page, default_error_page, default_fixed_page, Config, HttpConfig,
    LoggingConfig, PagesConfig, PerformanceConfig, ResponderMode, ServerConfig,
};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Missing file is fine, defaults and `HELLO_WEB_*` environment variables apply
    /// (nested keys use `__`, e.g. `HELLO_WEB_SERVER__PORT=9000`)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("HELLO_WEB")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.mode", "static")?
            .set_default("server.root", ".")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.file_read_timeout", 10)?
            .set_default("performance.shutdown_timeout", 30)?
            .set_default("http.server_name", "hello_web")?
            .set_default("http.chunk_size", 8192)?
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration and apply command line overrides on top
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let mut cfg = Self::load_from(&cli.config)?;
        cli.apply(&mut cfg);
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Error page template, read from `pages.error_file` when configured
    pub fn error_template(&self) -> std::io::Result<String> {
        match &self.pages.error_file {
            Some(path) => std::fs::read_to_string(path),
            None => Ok(self.pages.error.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("definitely-missing-config-file").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.mode, ResponderMode::Static);
        assert_eq!(cfg.server.root, ".");
        assert_eq!(cfg.http.chunk_size, 8192);
        assert_eq!(cfg.performance.file_read_timeout, 10);
        assert_eq!(cfg.performance.shutdown_timeout, 30);
        assert!(cfg.pages.error.contains("{path}"));
        assert!(cfg.pages.error.contains("{msg}"));
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("definitely-missing-config-file").unwrap();
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("fixed".parse::<ResponderMode>(), Ok(ResponderMode::Fixed));
        assert_eq!(
            "diagnostic".parse::<ResponderMode>(),
            Ok(ResponderMode::Diagnostic)
        );
        assert!("proxy".parse::<ResponderMode>().is_err());
    }
}
