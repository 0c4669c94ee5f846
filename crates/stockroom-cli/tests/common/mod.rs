//! Shared E2E test helpers for `stockroom` binary tests.

#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Default timeout for CLI tests.
pub const TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variables that would leak the developer's setup into tests.
const ENV_VARS: &[&str] = &[
    "STOCKROOM_DEBUG",
    "STOCKROOM_API_URL",
    "STOCKROOM_TIMEOUT_SECS",
    "STOCKROOM_CREDENTIALS",
    "STOCKROOM_PASSWORD",
    "RUST_LOG",
];

/// Build a Command for the `stockroom` binary isolated in a tempdir.
///
/// `HOME`, the project root and the credentials file all point into the
/// tempdir. Returns (command, guard); keep the guard alive for the test.
pub fn stockroom_cmd() -> (assert_cmd::Command, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let cmd = stockroom_cmd_in(&tmp);
    (cmd, tmp)
}

/// Same as [`stockroom_cmd`] but reusing `tmp` (multi-step tests).
pub fn stockroom_cmd_in(tmp: &tempfile::TempDir) -> assert_cmd::Command {
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("stockroom");
    cmd.timeout(TIMEOUT);
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("HOME", tmp.path());
    cmd.args(["-C", tmp.path().to_str().expect("valid utf8")]);
    cmd.args([
        "--credentials",
        credentials_path(tmp).to_str().expect("valid utf8"),
    ]);
    cmd
}

pub fn credentials_path(tmp: &tempfile::TempDir) -> PathBuf {
    tmp.path().join("credentials.json")
}

/// Starts a mock API answering by `(method, path)`; returns its base URL.
///
/// Unrouted requests get a 404 error envelope.
pub fn mock_api(routes: Vec<(&'static str, &'static str, u16, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock API");
    let port = listener.local_addr().expect("mock port").port();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };

            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = match stream.read(&mut buf) {
                    Ok(n) => n,
                    Err(_) => break,
                };
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let req_str = String::from_utf8_lossy(&request);
                if let Some(header_end) = req_str.find("\r\n\r\n") {
                    let content_length: usize = req_str[..header_end]
                        .lines()
                        .find(|l| l.to_lowercase().starts_with("content-length:"))
                        .and_then(|l| l.split(':').nth(1))
                        .and_then(|v| v.trim().parse().ok())
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            let req_str = String::from_utf8_lossy(&request);
            let mut parts = req_str.split_whitespace();
            let method = parts.next().unwrap_or("");
            let target = parts.next().unwrap_or("");
            let path = target
                .strip_prefix("/api/v1")
                .unwrap_or(target)
                .split('?')
                .next()
                .unwrap_or("");

            let (status, body) = routes
                .iter()
                .find(|(m, p, _, _)| *m == method && *p == path)
                .map(|(_, _, s, b)| (*s, b.clone()))
                .unwrap_or_else(|| {
                    (
                        404,
                        r#"{"success":false,"error":{"code":"NOT_FOUND","message":"Route not found"}}"#
                            .to_string(),
                    )
                });

            let response = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    format!("http://127.0.0.1:{port}/api/v1")
}

pub fn user_json(username: &str, role: &str) -> String {
    format!(
        r#"{{"id":1,"username":"{username}","email":"{username}@example.com","role":{{"id":2,"name":"{role}","description":""}},"isActive":true,"createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}}"#
    )
}

pub fn login_body(username: &str, role: &str, token: &str) -> String {
    format!(
        r#"{{"success":true,"data":{{"user":{},"token":"{token}","expiresIn":"24h"}}}}"#,
        user_json(username, role)
    )
}

pub fn profile_body(username: &str, role: &str) -> String {
    format!(r#"{{"success":true,"data":{}}}"#, user_json(username, role))
}
