//! Integration tests for the no-cache static server
//!
//! A real listener is bound on an ephemeral port and exercised with raw
//! HTTP requests.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;

use tempfile::TempDir;
use tokio::sync::oneshot;
use webgl_devtools::app::server::{NoCacheServer, ServerConfig};

fn site() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("test.html"), "<p>conformance</p>").unwrap();
    std::fs::create_dir(temp_dir.path().join("resources")).unwrap();
    std::fs::write(temp_dir.path().join("resources").join("a.js"), "1;").unwrap();
    temp_dir
}

fn request(addr: SocketAddr, method: &str, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    write!(
        stream,
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
    )
    .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

fn header<'a>(response: &'a str, name: &str) -> Option<&'a str> {
    let head = response.split("\r\n\r\n").next()?;
    head.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim())
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_serves_files_without_caching() {
    let root = site();
    let config = ServerConfig {
        bind: "127.0.0.1".to_string(),
        port: 0,
        threads: 2,
        ..Default::default()
    };
    let server = Arc::new(NoCacheServer::bind(&config, root.path()).unwrap());
    let addr = server.local_addr().unwrap();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(Arc::clone(&server).run_until(async {
        let _ = stop_rx.await;
    }));

    let responses = tokio::task::spawn_blocking(move || {
        vec![
            request(addr, "GET", "/test.html"),
            request(addr, "HEAD", "/test.html"),
            request(addr, "GET", "/missing.html"),
            request(addr, "GET", "/resources"),
            request(addr, "GET", "/resources/"),
            request(addr, "POST", "/test.html"),
        ]
    })
    .await
    .unwrap();

    let get = &responses[0];
    assert!(get.starts_with("HTTP/1.1 200"));
    assert_eq!(
        header(get, "Cache-Control"),
        Some("no-cache, no-store, must-revalidate")
    );
    assert_eq!(header(get, "Pragma"), Some("no-cache"));
    assert_eq!(header(get, "Expires"), Some("0"));
    assert!(get.ends_with("<p>conformance</p>"));

    let head = &responses[1];
    assert!(head.starts_with("HTTP/1.1 200"));
    assert!(!head.contains("<p>conformance</p>"));

    let missing = &responses[2];
    assert!(missing.starts_with("HTTP/1.1 404"));
    assert_eq!(header(missing, "Expires"), Some("0"));

    let redirect = &responses[3];
    assert!(redirect.starts_with("HTTP/1.1 301"));
    assert_eq!(header(redirect, "Location"), Some("/resources/"));

    let listing = &responses[4];
    assert!(listing.starts_with("HTTP/1.1 200"));
    assert!(listing.contains("href=\"a.js\""));

    assert!(responses[5].starts_with("HTTP/1.1 501"));

    stop_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[test]
fn test_bind_rejects_missing_root() {
    let root = site();
    let config = ServerConfig {
        bind: "127.0.0.1".to_string(),
        port: 0,
        ..Default::default()
    };
    assert!(NoCacheServer::bind(&config, &root.path().join("nope")).is_err());
}
