//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves canned replies keyed by request target (path plus query string).
//! Replies for a target are served in order and the last one repeats. Every
//! response closes the connection. Counts hits and records the `Accept`
//! header per target.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    body: Vec<u8>,
    delay: Duration,
}

#[derive(Debug, Default)]
struct State {
    routes: HashMap<String, Vec<Reply>>,
    hits: HashMap<String, usize>,
    accepts: HashMap<String, String>,
}

#[derive(Clone)]
pub struct StaticServer {
    base: String,
    state: Arc<Mutex<State>>,
}

impl StaticServer {
    /// Binds an ephemeral port and serves until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State::default()));
        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&shared);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{port}"),
            state,
        }
    }

    /// Base URL without trailing slash, e.g. `http://127.0.0.1:12345`.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, target: &str) -> String {
        format!("{}{}", self.base, target)
    }

    pub fn route(&self, target: &str, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        self.push(target, status, body.into(), Duration::ZERO)
    }

    pub fn route_slow(&self, target: &str, delay: Duration, body: impl Into<Vec<u8>>) -> &Self {
        self.push(target, 200, body.into(), delay)
    }

    fn push(&self, target: &str, status: u16, body: Vec<u8>, delay: Duration) -> &Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .entry(target.to_string())
            .or_default()
            .push(Reply { status, body, delay });
        self
    }

    pub fn hits(&self, target: &str) -> usize {
        self.state.lock().unwrap().hits.get(target).copied().unwrap_or(0)
    }

    pub fn accept(&self, target: &str) -> Option<String> {
        self.state.lock().unwrap().accepts.get(target).cloned()
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let Ok(request) = std::str::from_utf8(&request) else {
        return;
    };
    let mut lines = request.split("\r\n");
    let target = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let accept = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("accept"))
        .map(|(_, value)| value.trim().to_string());

    let reply = {
        let mut state = state.lock().unwrap();
        let served = state.hits.get(&target).copied().unwrap_or(0);
        let reply = state
            .routes
            .get(&target)
            .and_then(|replies| replies.get(served).or_else(|| replies.last()))
            .cloned();
        if reply.is_some() {
            *state.hits.entry(target.clone()).or_default() += 1;
            if let Some(accept) = accept {
                state.accepts.insert(target.clone(), accept);
            }
        }
        reply
    };

    let reply = reply.unwrap_or(Reply {
        status: 404,
        body: Vec::new(),
        delay: Duration::ZERO,
    });
    if !reply.delay.is_zero() {
        thread::sleep(reply.delay);
    }
    let reason = match reply.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reason,
        reply.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&reply.body);
    let _ = stream.flush();
}
