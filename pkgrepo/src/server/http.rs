//! Static file serving for the repository root.
//!
//! Only files are served. Directories are never listed, paths that escape
//! the root are refused with 403, and anything else that cannot be mapped
//! to a regular file is a 404. `HEAD` is answered alongside `GET`; other
//! methods get 405 from the router.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path as RequestPath, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use super::path::{resolve_request_path, RequestPathError};

/// Build the router serving files below `root`.
///
/// `root` must be canonical; see [`super::resolve_repo_path`].
pub fn router(root: PathBuf) -> Router {
    Router::new()
        .route("/", get(root_listing))
        .route("/*path", get(serve_file))
        .with_state(Arc::new(root))
}

async fn root_listing() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn serve_file(
    State(root): State<Arc<PathBuf>>,
    RequestPath(request_path): RequestPath<String>,
) -> Response {
    let file = match resolve_request_path(&root, &request_path) {
        Ok(file) => file,
        Err(RequestPathError::NotFound) => {
            debug!(path = %request_path, "not found");
            return StatusCode::NOT_FOUND.into_response();
        }
        Err(RequestPathError::Forbidden) => {
            warn!(path = %request_path, "refusing path outside repository root");
            return StatusCode::FORBIDDEN.into_response();
        }
    };

    let handle = match File::open(&file).await {
        Ok(handle) => handle,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return StatusCode::NOT_FOUND.into_response();
        }
        Err(e) => {
            warn!(path = %file.display(), error = %e, "failed to open file");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let size = match handle.metadata().await {
        Ok(meta) => meta.len(),
        Err(e) => {
            warn!(path = %file.display(), error = %e, "failed to stat file");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    debug!(path = %request_path, size, "serving file");
    let body = Body::from_stream(ReaderStream::new(handle));
    let mut response = ([(header::CONTENT_TYPE, content_type(&file))], body).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_LENGTH, HeaderValue::from(size));
    response
}

/// Content type reported for a served file, chosen by extension.
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("toml") => "application/toml",
        Some("pkg") | Some("tgz") | Some("gz") => "application/gzip",
        Some("json") => "application/json",
        Some("txt") | Some("md") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
