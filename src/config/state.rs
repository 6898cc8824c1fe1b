// Application state module
// Immutable per-process state shared by every connection task

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::sync::Notify;

use super::types::Config;
use crate::handler::Responder;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Responder selected by `server.mode`, built once at startup
    pub responder: Responder,
    /// Connections currently being served
    pub active_connections: AtomicUsize,
    /// Notified once when the process should stop accepting
    pub shutdown: Arc<Notify>,
}

impl AppState {
    /// Create `AppState` from loaded configuration
    pub fn new(config: &Config) -> std::io::Result<Self> {
        let responder = Responder::from_config(config)?;
        Ok(Self::with_responder(config, responder))
    }

    /// Create `AppState` around an already built responder
    pub fn with_responder(config: &Config, responder: Responder) -> Self {
        Self {
            config: config.clone(),
            responder,
            active_connections: AtomicUsize::new(0),
            shutdown: Arc::new(Notify::new()),
        }
    }
}
