//! Command line interface
//!
//! Flags override values loaded from the configuration file and environment.

use clap::Parser;

use crate::config::{Config, ResponderMode};

/// Minimal HTTP server: fixed page, diagnostic page or static files
#[derive(Debug, Clone, Parser)]
#[command(name = "hello_web", version, about)]
pub struct Cli {
    /// Configuration file path (extension optional)
    #[arg(short, long, default_value = "config", env = "HELLO_WEB_CONFIG")]
    pub config: String,

    /// Directory to serve files from
    #[arg(short, long)]
    pub root: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Responder: fixed, diagnostic or static
    #[arg(short, long)]
    pub mode: Option<ResponderMode>,
}

impl Cli {
    /// Apply command line overrides to a loaded configuration
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(root) = &self.root {
            cfg.server.root.clone_from(root);
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
        if let Some(host) = &self.host {
            cfg.server.host.clone_from(host);
        }
        if let Some(mode) = self.mode {
            cfg.server.mode = mode;
        }
    }
}
