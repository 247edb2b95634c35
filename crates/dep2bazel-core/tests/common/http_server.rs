//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed set of paths; anything else is 404. A route can be marked
//! flaky, in which case its first request is answered with 503.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Route {
    pub body: Vec<u8>,
    /// Answer the first request with 503 Service Unavailable.
    pub flaky: bool,
}

impl Route {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            flaky: false,
        }
    }

    pub fn flaky(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            flaky: true,
        }
    }
}

pub struct Server {
    /// Base URL without trailing slash, e.g. "http://127.0.0.1:12345".
    pub base: String,
    hits: Arc<AtomicUsize>,
}

impl Server {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Requests received so far, across all paths.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> Server {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, (Route, AtomicUsize)>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), (r, AtomicUsize::new(0))))
            .collect(),
    );
    let hits = Arc::new(AtomicUsize::new(0));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    Server {
        base: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, (Route, AtomicUsize)>,
    hits: &AtomicUsize,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    hits.fetch_add(1, Ordering::SeqCst);

    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");
    let path = target.split('?').next().unwrap_or(target);

    let (status, body): (&str, &[u8]) = match routes.get(path) {
        Some((route, seen)) => {
            let nth = seen.fetch_add(1, Ordering::SeqCst);
            if route.flaky && nth == 0 {
                ("503 Service Unavailable", b"busy")
            } else {
                ("200 OK", &route.body)
            }
        }
        None => ("404 Not Found", b"not found"),
    };
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}
