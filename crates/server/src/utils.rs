use std::path::Path;

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::state::ErrorResponse;

pub fn json_error(
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub fn json_error_response(status: StatusCode, message: impl Into<String>) -> Response {
    json_error(status, message).into_response()
}

pub fn file_response(path: &Path, data: Vec<u8>) -> Response {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let mut response = Response::new(Body::from(data));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(mime.as_ref())
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    response
}

/// True when `path` sits under the configured root. The root is the
/// serving allow-list: anything outside it must never leave the server.
pub fn path_under_root(path: &str, root: &str) -> bool {
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        return false;
    }
    match path.strip_prefix(root) {
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::path_under_root;

    #[test]
    fn accepts_paths_under_the_root() {
        assert!(path_under_root("/data/Music/A/01.mp3", "/data/"));
        assert!(path_under_root("/data/Music/A/01.mp3", "/data"));
    }

    #[test]
    fn rejects_escapes_and_partial_prefixes() {
        assert!(!path_under_root("/etc/passwd", "/data/"));
        assert!(!path_under_root("/database/x.mp3", "/data"));
        assert!(!path_under_root("/data/Music/01.mp3", ""));
    }
}
