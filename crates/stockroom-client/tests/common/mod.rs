//! Shared helpers for client integration tests.
//!
//! [`MockApi`] is a one-request-per-connection HTTP server on a loopback
//! port. Every connection is served on its own thread, so a slow route
//! does not hold up the others. Every request is recorded; the response
//! comes from a routing closure.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use stockroom_client::config::ApiConfig;
use stockroom_client::session::{MemoryCredentialStore, SessionManager, SessionState};
use stockroom_client::ApiClient;

/// A request as the server saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path including the query string, base prefix stripped.
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn route(&self) -> (&str, &str) {
        let path = self.path.split('?').next().unwrap_or("");
        (self.method.as_str(), path)
    }
}

pub type Reply = (u16, String);

pub struct MockApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockApi {
    /// Starts the server; `route` answers every request.
    pub fn start<F>(route: F) -> Self
    where
        F: Fn(&Recorded) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock API");
        let port = listener.local_addr().expect("mock port").port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        let route = Arc::new(route);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let route = Arc::clone(&route);
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    let Some(request) = read_request(&mut stream) else {
                        return;
                    };
                    log.lock().unwrap().push(request.clone());
                    let (status, body) = route(&request);
                    write_response(&mut stream, status, &body);
                });
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}/api/v1"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn client(&self) -> ApiClient {
        let config = ApiConfig {
            base_url: self.base_url.clone(),
            timeout_secs: 5,
        };
        ApiClient::new(&config, Arc::new(SessionState::new())).expect("build client")
    }

    pub fn manager(&self, store: MemoryCredentialStore) -> SessionManager<MemoryCredentialStore> {
        SessionManager::new(self.client(), store)
    }
}

fn read_request(stream: &mut TcpStream) -> Option<Recorded> {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];

    let (header_end, content_length) = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        raw.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&raw);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find(|l| l.to_lowercase().starts_with("content-length:"))
                .and_then(|l| l.split(':').nth(1))
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0usize);
            break (end, length);
        }
    };

    while raw.len() < header_end + 4 + content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
    }

    let text = String::from_utf8_lossy(&raw).to_string();
    let (head, body) = text.split_at(header_end);
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?;

    let authorization = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("authorization"))
        .map(|(_, value)| value.trim().to_string());

    Some(Recorded {
        method,
        path: target.strip_prefix("/api/v1").unwrap_or(target).to_string(),
        authorization,
        body: body.trim_start_matches("\r\n\r\n").to_string(),
    })
}

fn write_response(stream: &mut TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

// ─── Fixtures ────────────────────────────────────────────────────

pub fn user_json(id: i64, username: &str, role: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "role": { "id": 1, "name": role, "description": "" },
        "isActive": true,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}

pub fn login_reply(username: &str, role: &str, token: &str) -> Reply {
    let body = serde_json::json!({
        "success": true,
        "data": { "user": user_json(1, username, role), "token": token, "expiresIn": "24h" }
    });
    (200, body.to_string())
}

pub fn profile_reply(username: &str, role: &str) -> Reply {
    let body = serde_json::json!({ "success": true, "data": user_json(1, username, role) });
    (200, body.to_string())
}

pub fn item_json(id: i64, quantity: i64, price: f64, day: u32) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("item-{id}"),
        "quantity": quantity,
        "unitPrice": price,
        "sku": format!("SKU-{id}"),
        "createdAt": format!("2024-03-{day:02}T00:00:00Z"),
        "updatedAt": format!("2024-03-{day:02}T00:00:00Z")
    })
}

pub fn page_reply(items: Vec<serde_json::Value>, total: u64) -> Reply {
    let body = serde_json::json!({
        "success": true,
        "data": items,
        "pagination": {
            "page": 1, "limit": 10, "total": total, "totalPages": 1,
            "hasNext": false, "hasPrev": false
        }
    });
    (200, body.to_string())
}

pub fn error_reply(status: u16, code: &str, message: &str) -> Reply {
    let body = serde_json::json!({
        "success": false,
        "error": { "code": code, "message": message }
    });
    (status, body.to_string())
}
