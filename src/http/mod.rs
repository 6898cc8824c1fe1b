//! HTTP protocol layer module
//!
//! Response builders, body types and MIME detection, independent of which
//! responder produced the content.

pub mod body;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use body::{empty, file_body, full, ResponseBody};
pub use response::{
    build_405_response, build_error_page_response, build_file_response, build_html_response,
};
