//! Per-request failure taxonomy
//!
//! Every variant is turned into a 404 error page at the request boundary.
//! Messages only carry the request path, never the resolved filesystem path.

use thiserror::Error;

/// Failure to serve a request path from the server root
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServeError {
    /// Resolved path does not exist
    #[error("'{path}' not found")]
    NotFound { path: String },

    /// Resolved path exists but is not a regular file
    #[error("Unknown object '{path}'")]
    UnknownObject { path: String },

    /// Filesystem access failed after the path was resolved
    #[error("Failed to read '{path}': {message}")]
    ReadError { path: String, message: String },

    /// Resolved path escapes the server root
    #[error("'{path}' is outside the server root")]
    PathTraversal { path: String },
}

impl ServeError {
    /// Request path this error refers to
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path }
            | Self::UnknownObject { path }
            | Self::ReadError { path, .. }
            | Self::PathTraversal { path } => path,
        }
    }

    /// Short name used in logs
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::UnknownObject { .. } => "unknown_object",
            Self::ReadError { .. } => "read_error",
            Self::PathTraversal { .. } => "path_traversal",
        }
    }

    pub(crate) fn read_error(path: &str, err: &std::io::Error) -> Self {
        Self::ReadError {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}
