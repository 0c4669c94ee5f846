//! REST transport.
//!
//! ```text
//! service call
//!   → authorize(Permission)        advisory gate, no request on denial
//!   → request(method, path)        base URL + bearer token from SessionState
//!   → execute()                    send, read body, interpret
//!       2xx  JSON      → T
//!       2xx  non-JSON  → T from null
//!       4xx/5xx JSON   → ClientError::Api
//!       4xx/5xx other  → ClientError::Http (body truncated)
//!       401            → SessionState::invalidate_if_current(g)
//!                          (g = generation the request was sent under)
//! ```

use crate::config::ApiConfig;
use crate::session::SessionState;
use crate::ClientError;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use stockroom_auth::{Permission, RoleSource};
use stockroom_types::{FieldError, Role};

/// Maximum bytes of a non-JSON error body kept in [`ClientError::Http`].
const MAX_ERROR_BODY: usize = 512;

/// Async JSON client for the stockroom REST API.
///
/// Cheap to clone; clones share the connection pool and session state.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    state: Arc<SessionState>,
}

impl ApiClient {
    /// Builds a client for `config`, reading tokens from `state`.
    ///
    /// # Errors
    ///
    /// [`ClientError::Build`] if the TLS backend cannot be initialised.
    pub fn new(config: &ApiConfig, state: Arc<SessionState>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("stockroom/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            state,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    /// Checks `permission` against the current session.
    ///
    /// # Errors
    ///
    /// [`ClientError::Denied`] when the session is unresolved, signed out
    /// or lacks the permission.
    pub fn authorize(&self, permission: Permission) -> Result<(), ClientError> {
        self.state.decide(permission).require().map_err(|denied| {
            tracing::debug!(%permission, error = %denied, "request blocked client-side");
            ClientError::Denied(denied)
        })
    }

    /// Checks that the principal holds at least `role`.
    ///
    /// # Errors
    ///
    /// [`ClientError::Denied`] when the session is unresolved, signed out
    /// or below `role`.
    pub fn authorize_role(&self, role: Role) -> Result<(), ClientError> {
        self.state
            .authorizer()
            .minimum_role(role)
            .require()
            .map_err(|denied| {
                tracing::debug!(%role, error = %denied, "request blocked client-side");
                ClientError::Denied(denied)
            })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let (req, generation) = self.request(Method::GET, path);
        self.execute(req, Some(generation)).await
    }

    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let (req, generation) = self.request(Method::GET, path);
        self.execute(req.query(query), Some(generation)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (req, generation) = self.request(Method::POST, path);
        self.execute(req.json(body), Some(generation)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (req, generation) = self.request(Method::PUT, path);
        self.execute(req.json(body), Some(generation)).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (req, generation) = self.request(Method::PATCH, path);
        self.execute(req.json(body), Some(generation)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let (req, generation) = self.request(Method::DELETE, path);
        self.execute(req, Some(generation)).await
    }

    pub async fn delete_with_body<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (req, generation) = self.request(Method::DELETE, path);
        self.execute(req.json(body), Some(generation)).await
    }

    /// GET for downloads: returns the document as text.
    ///
    /// A JSON envelope whose `data` is a string yields that string; any
    /// other `data` is pretty-printed; a non-JSON body is returned as is.
    pub async fn get_text(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, ClientError> {
        let (req, generation) = self.request(Method::GET, path);
        let (status, body) = self.send(req.query(query), Some(generation)).await?;
        if !(200..300).contains(&status) {
            return interpret(status, &body);
        }
        Ok(document_text(body))
    }

    /// POST without a session token and without the 401 hook (login).
    pub(crate) async fn post_anonymous<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.http.post(self.url(path)).json(body);
        self.execute(req, None).await
    }

    /// Request with an explicit token and without the 401 hook
    /// (bootstrap validation, logout).
    pub(crate) async fn send_with_token<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: &str,
    ) -> Result<T, ClientError> {
        let req = self.http.request(method, self.url(path)).bearer_auth(token);
        self.execute(req, None).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Builder carrying the current token, plus the session generation
    /// that token belongs to.
    fn request(&self, method: Method, path: &str) -> (RequestBuilder, u64) {
        let req = self.http.request(method, self.url(path));
        let (token, generation) = self.state.token_with_generation();
        let req = match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        (req, generation)
    }

    /// Sends `req`. With `sent_under`, a 401 invalidates the session of
    /// that generation.
    async fn execute<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        sent_under: Option<u64>,
    ) -> Result<T, ClientError> {
        let (status, body) = self.send(req, sent_under).await?;
        interpret(status, &body)
    }

    /// Sends and reads the body; runs the 401 hook.
    async fn send(
        &self,
        req: RequestBuilder,
        sent_under: Option<u64>,
    ) -> Result<(u16, String), ClientError> {
        let response = req.send().await.map_err(|e| transport_error(&e))?;
        let status = response.status().as_u16();
        let url = response.url().path().to_string();
        let body = response.text().await.map_err(|e| transport_error(&e))?;

        tracing::debug!(status, path = %url, bytes = body.len(), "response");

        if status == 401 {
            if let Some(generation) = sent_under {
                self.state.invalidate_if_current(generation);
            }
        }
        Ok((status, body))
    }
}

fn document_text(body: String) -> String {
    let Ok(value) = serde_json::from_str::<Value>(&body) else {
        return body;
    };
    match value.get("data") {
        Some(Value::String(text)) => text.clone(),
        Some(data) => serde_json::to_string_pretty(data).unwrap_or(body),
        None => body,
    }
}

/// Turns a status and body into a typed result.
fn interpret<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ClientError> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if (200..300).contains(&status) {
        return serde_json::from_value(parsed.unwrap_or(Value::Null)).map_err(ClientError::Decode);
    }

    match parsed {
        Some(value) => Err(api_error(status, &value)),
        None => Err(ClientError::Http {
            status,
            body: truncate_for_error(body.trim(), MAX_ERROR_BODY).to_string(),
        }),
    }
}

/// Reads `{ "error": { code, message, details } }`, falling back to a
/// top-level `message` and finally to a generic text.
fn api_error(status: u16, value: &Value) -> ClientError {
    let error = value.get("error");
    let field = |name: &str| {
        error
            .and_then(|e| e.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let message = field("message")
        .or_else(|| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("request failed with status {status}"));

    let details: Vec<FieldError> = error
        .and_then(|e| e.get("details"))
        .and_then(|d| serde_json::from_value(d.clone()).ok())
        .unwrap_or_default();

    ClientError::Api {
        status,
        code: field("code"),
        message,
        details,
    }
}

/// Classifies a transport failure into a kind and message.
fn transport_error(error: &reqwest::Error) -> ClientError {
    let message = error.to_string();

    let kind = if error.is_timeout() {
        "timeout"
    } else if let Some(io) = find_io_error(error) {
        match io.kind() {
            std::io::ErrorKind::TimedOut => "timeout",
            std::io::ErrorKind::ConnectionRefused => "connection_refused",
            _ => classify_message(&message),
        }
    } else {
        classify_message(&message)
    };

    tracing::warn!(kind, error = %message, "request failed");
    ClientError::Transport { kind, message }
}

fn find_io_error(error: &reqwest::Error) -> Option<&std::io::Error> {
    let mut source: Option<&(dyn std::error::Error + 'static)> = std::error::Error::source(error);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            return Some(io);
        }
        source = err.source();
    }
    None
}

fn classify_message(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        "timeout"
    } else if lower.contains("connection refused") {
        "connection_refused"
    } else if lower.contains("dns") || lower.contains("resolve") {
        "dns"
    } else if lower.contains("tls") || lower.contains("certificate") {
        "tls"
    } else {
        "network"
    }
}

/// Truncates at a char boundary no later than `max` bytes.
fn truncate_for_error(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_types::{ApiResponse, InventoryItem};

    #[test]
    fn success_json_decodes() {
        let resp: ApiResponse<u32> = interpret(200, r#"{"success":true,"data":7}"#).unwrap();
        assert_eq!(resp.data, 7);
    }

    #[test]
    fn success_non_json_is_null() {
        let v: Option<ApiResponse<Value>> = interpret(204, "").unwrap();
        assert!(v.is_none());
        let v: Value = interpret(200, "OK").unwrap();
        assert_eq!(v, Value::Null);
    }

    #[test]
    fn success_wrong_shape_is_decode_error() {
        let err = interpret::<ApiResponse<InventoryItem>>(200, r#"{"data":1}"#).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn error_envelope_maps_fields() {
        let body = r#"{"success":false,"error":{"code":"VALIDATION_ERROR","message":"Invalid input","details":[{"field":"email","message":"is invalid"}]}}"#;
        match interpret::<Value>(422, body).unwrap_err() {
            ClientError::Api {
                status,
                code,
                message,
                details,
            } => {
                assert_eq!(status, 422);
                assert_eq!(code.as_deref(), Some("VALIDATION_ERROR"));
                assert_eq!(message, "Invalid input");
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "email");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn error_json_without_envelope() {
        let err = interpret::<Value>(400, r#"{"message":"bad request"}"#).unwrap_err();
        assert_eq!(err.to_string(), "API error 400: bad request");

        let err = interpret::<Value>(500, "{}").unwrap_err();
        assert!(err.to_string().contains("request failed with status 500"));
    }

    #[test]
    fn error_non_json_is_http_truncated() {
        let html = format!("<html>{}</html>", "x".repeat(2000));
        match interpret::<Value>(502, &html).unwrap_err() {
            ClientError::Http { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body.len(), MAX_ERROR_BODY);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn document_text_unwraps_envelopes() {
        assert_eq!(document_text("id,name\n1,a\n".into()), "id,name\n1,a\n");
        assert_eq!(
            document_text(r#"{"success":true,"data":"id,name\n"}"#.into()),
            "id,name\n"
        );
        assert_eq!(
            document_text(r#"{"success":true,"data":[{"sku":"A"}]}"#.into()),
            "[\n  {\n    \"sku\": \"A\"\n  }\n]"
        );
        assert_eq!(document_text(r#"{"rows":1}"#.into()), r#"{"rows":1}"#);
    }

    #[test]
    fn message_classification() {
        assert_eq!(classify_message("operation timed out"), "timeout");
        assert_eq!(classify_message("Connection refused (os error 111)"), "connection_refused");
        assert_eq!(classify_message("failed to lookup address: dns error"), "dns");
        assert_eq!(classify_message("invalid peer certificate"), "tls");
        assert_eq!(classify_message("broken pipe"), "network");
    }

    #[test]
    fn truncate_for_error_utf8() {
        assert_eq!(truncate_for_error("hello", 10), "hello");
        assert_eq!(truncate_for_error("héllo", 2), "h");
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let config = ApiConfig {
            base_url: "http://localhost:3001/api/v1/".into(),
            ..Default::default()
        };
        let client = ApiClient::new(&config, Arc::new(SessionState::new())).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001/api/v1");
        assert_eq!(client.url("/inventory"), "http://localhost:3001/api/v1/inventory");
    }

    #[test]
    fn authorize_follows_session() {
        let state = Arc::new(SessionState::new());
        let client = ApiClient::new(&ApiConfig::default(), Arc::clone(&state)).unwrap();

        let err = client.authorize(Permission::InventoryView).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Denied(stockroom_auth::AccessDenied::Pending)
        ));

        state.sign_in(
            stockroom_auth::Principal::new(1, "v", stockroom_types::Role::Viewer),
            "t".into(),
        );
        assert!(client.authorize(Permission::InventoryView).is_ok());
        assert!(client.authorize(Permission::InventoryDelete).is_err());
    }

    #[test]
    fn authorize_role_checks_seniority() {
        let state = Arc::new(SessionState::new());
        let client = ApiClient::new(&ApiConfig::default(), Arc::clone(&state)).unwrap();
        state.sign_in(
            stockroom_auth::Principal::new(1, "m", Role::Manager),
            "t".into(),
        );

        assert!(client.authorize_role(Role::Manager).is_ok());
        assert!(matches!(
            client.authorize_role(Role::Admin).unwrap_err(),
            ClientError::Denied(stockroom_auth::AccessDenied::InsufficientRole {
                required: Role::Admin,
                actual: Role::Manager,
            })
        ));
    }
}
