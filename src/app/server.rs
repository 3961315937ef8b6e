//! No-cache static file server
//!
//! Serves a directory for local test runs. Browsers cache static files
//! aggressively, which hides edits to test pages and scripts, so every
//! response tells them not to.
//!
//! Request routing is kept separate from the socket handling so the path
//! rules can be tested without a listener.

use std::fs::File;
use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use tiny_http::{Header, Method, Request, Response, ResponseBox, Server, StatusCode};
use tracing::{debug, info, warn};
use url::Url;

use crate::constants::server;
use crate::errors::{ServerError, ServerResult};

/// Characters escaped in directory listing links
const LINK_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

/// Listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind; use `0.0.0.0` to serve remote clients
    pub bind: String,
    pub port: u16,
    /// Directory to serve (current directory when unset)
    pub directory: Option<PathBuf>,
    /// Request handling threads
    pub threads: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: server::DEFAULT_BIND.to_string(),
            port: server::DEFAULT_PORT,
            directory: None,
            threads: server::DEFAULT_THREADS,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Where a request path leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Serve this file
    File(PathBuf),
    /// List this directory; carries the request path for the page title
    Listing { dir: PathBuf, url_path: String },
    /// Directory requested without a trailing slash
    Redirect(String),
    BadRequest,
    Forbidden,
    NotFound,
}

/// Map a request target onto the served directory
///
/// The URL parser resolves `.` and `..` segments against the root, so a
/// request can never climb out of it; segments that only decode to a path
/// component afterwards (`%2e%2e`, `%2F`) are refused outright.
pub fn route(root: &Path, raw_url: &str) -> Route {
    let target = if raw_url.starts_with('/') {
        format!("http://localhost{}", raw_url)
    } else {
        format!("http://localhost/{}", raw_url)
    };
    let Ok(url) = Url::parse(&target) else {
        return Route::BadRequest;
    };

    let mut path = root.to_path_buf();
    if let Some(segments) = url.path_segments() {
        for segment in segments.filter(|s| !s.is_empty()) {
            let Ok(decoded) = percent_decode_str(segment).decode_utf8() else {
                return Route::BadRequest;
            };
            if decoded == "." || decoded == ".." || decoded.contains(['/', '\\', '\0']) {
                return Route::Forbidden;
            }
            path.push(decoded.as_ref());
        }
    }

    if path.is_dir() {
        if !url.path().ends_with('/') {
            let mut location = format!("{}/", url.path());
            if let Some(query) = url.query() {
                location.push('?');
                location.push_str(query);
            }
            return Route::Redirect(location);
        }

        let index = path.join(server::INDEX_FILE);
        if index.is_file() {
            return Route::File(index);
        }

        let url_path = percent_decode_str(url.path())
            .decode_utf8_lossy()
            .into_owned();
        return Route::Listing {
            dir: path,
            url_path,
        };
    }

    if path.is_file() {
        Route::File(path)
    } else {
        Route::NotFound
    }
}

/// Content type from a file extension
pub fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json",
        "txt" | "idl" | "dep" | "compiled" => "text/plain; charset=utf-8",
        "xml" => "application/xml",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "bmp" => "image/bmp",
        "wasm" => "application/wasm",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}

/// HTML listing of a directory, sorted case-insensitively
pub fn directory_listing(dir: &Path, url_path: &str) -> std::io::Result<String> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() {
            name.push('/');
        }
        entries.push(name);
    }
    entries.sort_by_key(|name| name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(url_path));
    let mut page = format!(
        "<!DOCTYPE HTML>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for name in &entries {
        page.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            utf8_percent_encode(name, LINK_ESCAPE),
            escape_html(name)
        ));
    }
    page.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(page)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

fn with_headers(mut response: ResponseBox, headers: &[(&str, &str)]) -> ResponseBox {
    for (name, value) in headers.iter().chain(server::NO_CACHE_HEADERS.iter()) {
        if let Some(header) = header(name, value) {
            response.add_header(header);
        }
    }
    response
}

fn status_page(code: u16, message: &str) -> ResponseBox {
    let body = format!(
        "<!DOCTYPE HTML>\n<html><head><title>Error {code}</title></head><body><h1>Error {code}</h1><p>{}</p></body></html>\n",
        escape_html(message)
    );
    with_headers(
        Response::from_data(body.into_bytes())
            .with_status_code(code)
            .boxed(),
        &[("Content-Type", "text/html; charset=utf-8")],
    )
}

/// Build the response for a routed request
pub fn respond_to(route: Route) -> ResponseBox {
    match route {
        Route::File(path) => match File::open(&path) {
            Ok(file) => with_headers(
                Response::from_file(file).boxed(),
                &[("Content-Type", content_type(&path))],
            ),
            Err(e) => {
                warn!("Failed to open {}: {}", path.display(), e);
                status_page(404, "File not found")
            }
        },
        Route::Listing { dir, url_path } => match directory_listing(&dir, &url_path) {
            Ok(page) => with_headers(
                Response::from_data(page.into_bytes()).boxed(),
                &[("Content-Type", "text/html; charset=utf-8")],
            ),
            Err(e) => {
                warn!("Failed to list {}: {}", dir.display(), e);
                status_page(404, "No permission to list directory")
            }
        },
        Route::Redirect(location) => with_headers(
            Response::empty(StatusCode(301)).boxed(),
            &[("Location", location.as_str())],
        ),
        Route::BadRequest => status_page(400, "Bad request path"),
        Route::Forbidden => status_page(403, "Forbidden"),
        Route::NotFound => status_page(404, "File not found"),
    }
}

/// Static file server over a fixed root
pub struct NoCacheServer {
    server: Server,
    root: PathBuf,
    threads: usize,
    shutdown: AtomicBool,
}

impl NoCacheServer {
    /// Bind the listener; the root directory must exist
    pub fn bind(config: &ServerConfig, root: &Path) -> ServerResult<Self> {
        let root = std::fs::canonicalize(root).map_err(|_| ServerError::RootNotFound {
            path: root.to_path_buf(),
        })?;
        if !root.is_dir() {
            return Err(ServerError::RootNotFound { path: root });
        }

        let address = config.address();
        let server = Server::http(&address).map_err(|e| ServerError::Bind {
            address: address.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            server,
            root,
            threads: config.threads.max(1),
            shutdown: AtomicBool::new(false),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    fn handle(&self, request: Request) {
        let method = request.method().clone();
        let url = request.url().to_string();

        let response = match method {
            Method::Get | Method::Head => respond_to(route(&self.root, &url)),
            _ => status_page(501, "Unsupported method"),
        };

        let status = response.status_code().0;
        debug!("{} {} -> {}", method, url, status);

        if let Err(e) = request.respond(response) {
            debug!("Client went away during {}: {}", url, e);
        }
    }

    fn worker_loop(&self) {
        loop {
            match self.server.recv() {
                Ok(request) => self.handle(request),
                Err(_) if self.shutdown.load(Ordering::SeqCst) => break,
                Err(e) => warn!("Failed to receive request: {}", e),
            }
        }
    }

    /// Serve until `shutdown` completes, then stop every worker
    pub async fn run_until<F>(self: Arc<Self>, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()>,
    {
        let workers: Vec<_> = (0..self.threads)
            .map(|index| {
                let server = Arc::clone(&self);
                thread::Builder::new()
                    .name(format!("serve-{index}"))
                    .spawn(move || server.worker_loop())
            })
            .collect::<std::io::Result<_>>()?;

        info!(
            "Serving {} on {} with {} threads",
            self.root.display(),
            self.local_addr()
                .map(|addr| addr.to_string())
                .unwrap_or_else(|| "unknown address".to_string()),
            workers.len()
        );

        shutdown.await;
        info!("Shutting down server");

        self.shutdown.store(true, Ordering::SeqCst);
        for _ in &workers {
            self.server.unblock();
        }

        tokio::task::spawn_blocking(move || {
            for worker in workers {
                if worker.join().is_err() {
                    warn!("Server worker panicked");
                }
            }
        })
        .await
        .map_err(|e| ServerError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

        Ok(())
    }
}
