//! Static file serving module
//!
//! Resolves request paths below a fixed root, streams regular files, and turns
//! every failure into the configured HTML error page with status 404.

use hyper::Response;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::fs::{self, File};

use super::pages::ErrorPage;
use super::RequestInfo;
use crate::error::ServeError;
use crate::http::{self, mime, ResponseBody};
use crate::logger;

pub const DEFAULT_CHUNK_SIZE: usize = 8192;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// A regular file below the root, opened and ready to stream
#[derive(Debug)]
pub struct ServedFile {
    pub file: File,
    pub len: u64,
    /// Canonical location, used for the content type
    pub path: PathBuf,
}

/// Serves files from one root directory
#[derive(Debug, Clone)]
pub struct StaticResponder {
    /// Canonical root, every served file must be below it
    root: PathBuf,
    error_page: ErrorPage,
    chunk_size: usize,
    read_timeout: Duration,
}

impl StaticResponder {
    /// Create a responder for `root`, which must be an existing directory
    pub fn new(root: impl AsRef<Path>, error_template: String) -> io::Result<Self> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("server root '{}' is not a directory", root.display()),
            ));
        }

        Ok(Self {
            root,
            error_page: ErrorPage::new(error_template),
            chunk_size: DEFAULT_CHUNK_SIZE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Answer one request: the file with status 200, or the error page with 404
    pub async fn handle(&self, req: &RequestInfo) -> Response<ResponseBody> {
        let is_head = req.is_head();
        match self.open(&req.path).await {
            Ok(served) => {
                let content_type = mime::content_type_for(&served.path);
                let body = if is_head {
                    http::empty()
                } else {
                    http::file_body(served.file, served.len, self.chunk_size, self.read_timeout)
                };
                http::build_file_response(body, content_type, served.len)
            }
            Err(err) => {
                logger::log_serve_failure(&err);
                self.error_response(&err, is_head)
            }
        }
    }

    /// Render `err` into a 404 error page response
    pub fn error_response(&self, err: &ServeError, is_head: bool) -> Response<ResponseBody> {
        http::build_error_page_response(self.error_page.render(err), is_head)
    }

    /// Resolve and open the file for `request_path`
    pub async fn open(&self, request_path: &str) -> Result<ServedFile, ServeError> {
        let path = self.resolve(request_path).await?;
        self.open_resolved(request_path, &path).await
    }

    /// Open a path returned by `resolve`
    ///
    /// Once the handle exists, the path is resolved again: it must still lead
    /// below the root, to the very file the handle refers to. A symlink swapped
    /// in after `resolve` is therefore refused rather than served.
    async fn open_resolved(&self, request_path: &str, path: &Path) -> Result<ServedFile, ServeError> {
        let read_error = |e: io::Error| ServeError::read_error(request_path, &e);

        let file = File::open(path).await.map_err(read_error)?;
        // Type and length come from the open handle, the path may have changed since resolve
        let meta = file.metadata().await.map_err(read_error)?;

        let current = fs::canonicalize(path).await.map_err(read_error)?;
        if !current.starts_with(&self.root) {
            return Err(ServeError::PathTraversal {
                path: request_path.to_string(),
            });
        }
        let current_meta = fs::metadata(&current).await.map_err(read_error)?;
        if !same_file(&meta, &current_meta) {
            return Err(read_error(io::Error::other("file changed while being opened")));
        }

        if !meta.is_file() {
            return Err(ServeError::UnknownObject {
                path: request_path.to_string(),
            });
        }

        Ok(ServedFile {
            file,
            len: meta.len(),
            path: current,
        })
    }

    /// Map a request path to a regular file below the root
    ///
    /// The path is used as received (no percent-decoding). Any `..` segment is
    /// rejected outright; the canonical target must also stay below the root,
    /// which catches symlinks pointing elsewhere.
    pub async fn resolve(&self, request_path: &str) -> Result<PathBuf, ServeError> {
        let not_found = || ServeError::NotFound {
            path: request_path.to_string(),
        };
        let traversal = || ServeError::PathTraversal {
            path: request_path.to_string(),
        };

        if !request_path.starts_with('/') {
            return Err(not_found());
        }

        let relative = Path::new(request_path.trim_start_matches('/'));
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(traversal());
                }
            }
        }

        let canonical = match fs::canonicalize(self.root.join(relative)).await {
            Ok(p) => p,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(ServeError::read_error(request_path, &e));
            }
            // Missing entries, and file names used as directories
            Err(_) => return Err(not_found()),
        };

        if !canonical.starts_with(&self.root) {
            return Err(traversal());
        }

        let meta = match fs::metadata(&canonical).await {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(ServeError::read_error(request_path, &e)),
        };
        if !meta.is_file() {
            return Err(ServeError::UnknownObject {
                path: request_path.to_string(),
            });
        }

        Ok(canonical)
    }
}

#[cfg(unix)]
fn same_file(a: &std::fs::Metadata, b: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_file(a: &std::fs::Metadata, b: &std::fs::Metadata) -> bool {
    a.len() == b.len() && a.modified().ok() == b.modified().ok()
}
