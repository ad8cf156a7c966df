//! Transient static file server.
//!
//! The capture batch serves the root directory over plain HTTP so the browser
//! sees real `http://` origins. The server is NOT a daemon: it binds once,
//! answers from a background thread for the duration of the batch, and is
//! unblocked and joined when the [`StaticServer`] guard drops — on success
//! and on every error path.

use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tiny_http::{Header, Response, Server};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind 127.0.0.1:{port}: {reason}")]
    Bind { port: u16, reason: String },
}

/// Serves one directory tree, read-only, until dropped.
pub struct StaticServer {
    server: Arc<Server>,
    handle: Option<thread::JoinHandle<()>>,
}

impl StaticServer {
    pub fn serve(root: &Path, port: u16) -> Result<Self, ServerError> {
        let server = Server::http(("127.0.0.1", port)).map_err(|e| ServerError::Bind {
            port,
            reason: e.to_string(),
        })?;
        let server = Arc::new(server);

        let worker = Arc::clone(&server);
        let root = root.to_path_buf();
        let handle = thread::spawn(move || {
            for request in worker.incoming_requests() {
                let response = respond(&root, request.url());
                // The client may have gone away mid-batch; nothing to do.
                let _ = request.respond(response);
            }
        });

        Ok(Self {
            server,
            handle: Some(handle),
        })
    }
}

impl Drop for StaticServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Build the response for one request URL against the document root.
fn respond(root: &Path, url: &str) -> Response<Cursor<Vec<u8>>> {
    match resolve(root, url) {
        Some(path) => match std::fs::read(&path) {
            Ok(data) => {
                let mime = content_type(&path);
                let header = Header::from_bytes(&b"Content-Type"[..], mime.as_bytes())
                    .expect("static header bytes");
                Response::from_data(data).with_header(header)
            }
            Err(_) => not_found(),
        },
        None => not_found(),
    }
}

fn not_found() -> Response<Cursor<Vec<u8>>> {
    Response::from_string("Not Found").with_status_code(404)
}

/// Map a request URL to a file under the root. Strips the query string,
/// percent-decodes, and refuses any path that would escape the root.
fn resolve(root: &Path, url: &str) -> Option<PathBuf> {
    let path = url.split('?').next().unwrap_or(url);
    let decoded = percent_decode(path);
    let relative = Path::new(decoded.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(root.join(relative))
}

/// Decode `%XX` escapes; malformed escapes pass through verbatim.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
            ) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("html") | Some("htm") => "text/html; charset=UTF-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn serves_files_under_the_root() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("site");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.html"), "<html>hi</html>").unwrap();

        let _server = StaticServer::serve(tmp.path(), 19181).unwrap();
        let body = reqwest::blocking::get("http://127.0.0.1:19181/site/index.html")
            .unwrap()
            .text()
            .unwrap();
        assert_eq!(body, "<html>hi</html>");
    }

    #[test]
    fn missing_file_is_404() {
        let tmp = TempDir::new().unwrap();
        let _server = StaticServer::serve(tmp.path(), 19182).unwrap();
        let status = reqwest::blocking::get("http://127.0.0.1:19182/nope.html")
            .unwrap()
            .status();
        assert_eq!(status.as_u16(), 404);
    }

    #[test]
    fn drop_releases_the_port() {
        let tmp = TempDir::new().unwrap();
        {
            let _server = StaticServer::serve(tmp.path(), 19183).unwrap();
        }
        // Rebinding succeeds once the guard has dropped.
        let _server = StaticServer::serve(tmp.path(), 19183).unwrap();
    }

    #[test]
    fn resolve_rejects_traversal() {
        let root = Path::new("/srv/root");
        assert_eq!(resolve(root, "/../etc/passwd"), None);
        assert_eq!(resolve(root, "/a/../../etc/passwd"), None);
        assert_eq!(
            resolve(root, "/a/index.html"),
            Some(PathBuf::from("/srv/root/a/index.html"))
        );
    }

    #[test]
    fn resolve_strips_query_string() {
        let root = Path::new("/srv/root");
        assert_eq!(
            resolve(root, "/a/index.html?cache=0"),
            Some(PathBuf::from("/srv/root/a/index.html"))
        );
    }

    #[test]
    fn percent_decoding_handles_spaces() {
        assert_eq!(percent_decode("/my%20folder/index.html"), "/my folder/index.html");
        assert_eq!(percent_decode("/plain/path"), "/plain/path");
        // Malformed escapes pass through verbatim.
        assert_eq!(percent_decode("/a%zzb"), "/a%zzb");
        assert_eq!(percent_decode("/trailing%"), "/trailing%");
    }

    #[test]
    fn content_types_cover_the_capture_formats() {
        assert_eq!(
            content_type(Path::new("a.html")),
            "text/html; charset=UTF-8"
        );
        assert_eq!(content_type(Path::new("a.png")), "image/png");
        assert_eq!(content_type(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(content_type(Path::new("a.bin")), "application/octet-stream");
    }
}
