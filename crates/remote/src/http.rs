//! reqwest implementation of the record-service contract
//!
//! Talks to a PocketBase-style HTTP API under
//! `/api/collections/users/...`. Every non-2xx response is classified
//! into a `RemoteFailure` at this boundary; transport errors never leak
//! as `reqwest::Error`. Successful auth calls write the shared store.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::failure::RemoteFailure;
use crate::record::{AuthResponse, NewUser, ProfilePatch, UserRecord};
use crate::service::{BoxFuture, RecordService, ServiceResult};
use crate::store::AuthStore;

/// HTTP record service bound to one base URL and one shared auth store.
pub struct HttpRecordService {
    client: reqwest::Client,
    base_url: String,
    store: Arc<AuthStore>,
}

impl HttpRecordService {
    /// Create a service with a default client.
    pub fn new(base_url: impl Into<String>, store: Arc<AuthStore>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, store)
    }

    /// Create a service with a caller-configured client (timeouts, proxy).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        store: Arc<AuthStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            store,
        }
    }

    /// The shared auth store this service writes on successful auth.
    pub fn store(&self) -> Arc<AuthStore> {
        self.store.clone()
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/api/collections/users/{suffix}", self.base_url)
    }

    async fn send_create(&self, user: &NewUser) -> ServiceResult<UserRecord> {
        debug!(payload = ?user, "creating user record");
        let response = self
            .client
            .post(self.url("records"))
            .json(user)
            .send()
            .await
            .map_err(transport)?;
        decode_json(response).await
    }

    async fn send_auth(&self, identity: &str, password: &str) -> ServiceResult<AuthResponse> {
        let response = self
            .client
            .post(self.url("auth-with-password"))
            .json(&json!({ "identity": identity, "password": password }))
            .send()
            .await
            .map_err(transport)?;
        let auth: AuthResponse = decode_json(response).await?;
        self.store.save(auth.token.clone(), auth.record.clone());
        Ok(auth)
    }

    async fn send_refresh(&self) -> ServiceResult<AuthResponse> {
        let token = self.store.token().unwrap_or_default();
        if token.is_empty() {
            return Err(RemoteFailure::Status {
                status: 401,
                message: "no stored token to refresh".into(),
            });
        }
        let response = self
            .client
            .post(self.url("auth-refresh"))
            .header(reqwest::header::AUTHORIZATION, token)
            .send()
            .await
            .map_err(transport)?;
        let auth: AuthResponse = decode_json(response).await?;
        self.store.save(auth.token.clone(), auth.record.clone());
        Ok(auth)
    }

    async fn send_email_request(&self, suffix: &str, email: &str) -> ServiceResult<()> {
        let response = self
            .client
            .post(self.url(suffix))
            .json(&json!({ "email": email }))
            .send()
            .await
            .map_err(transport)?;
        expect_success(response).await
    }

    async fn send_update(&self, id: &str, patch: &ProfilePatch) -> ServiceResult<UserRecord> {
        let mut request = self
            .client
            .patch(self.url(&format!("records/{id}")))
            .json(patch);
        if let Some(token) = self.store.token() {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }
        let response = request.send().await.map_err(transport)?;
        decode_json(response).await
    }
}

impl RecordService for HttpRecordService {
    fn create<'a>(&'a self, user: &'a NewUser) -> BoxFuture<'a, ServiceResult<UserRecord>> {
        Box::pin(self.send_create(user))
    }

    fn auth_with_password<'a>(
        &'a self,
        identity: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, ServiceResult<AuthResponse>> {
        Box::pin(self.send_auth(identity, password))
    }

    fn auth_refresh(&self) -> BoxFuture<'_, ServiceResult<AuthResponse>> {
        Box::pin(self.send_refresh())
    }

    fn request_password_reset<'a>(&'a self, email: &'a str) -> BoxFuture<'a, ServiceResult<()>> {
        Box::pin(self.send_email_request("request-password-reset", email))
    }

    fn request_verification<'a>(&'a self, email: &'a str) -> BoxFuture<'a, ServiceResult<()>> {
        Box::pin(self.send_email_request("request-verification", email))
    }

    fn update<'a>(
        &'a self,
        id: &'a str,
        patch: &'a ProfilePatch,
    ) -> BoxFuture<'a, ServiceResult<UserRecord>> {
        Box::pin(self.send_update(id, patch))
    }
}

fn transport(e: reqwest::Error) -> RemoteFailure {
    RemoteFailure::Transport(e.to_string())
}

/// Classify a non-success response into a `RemoteFailure`.
async fn read_failure(response: reqwest::Response) -> RemoteFailure {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("<no body>"));
    RemoteFailure::from_response(status, &body)
}

async fn expect_success(response: reqwest::Response) -> ServiceResult<()> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(read_failure(response).await)
    }
}

async fn decode_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> ServiceResult<T> {
    if !response.status().is_success() {
        return Err(read_failure(response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|e| RemoteFailure::Transport(format!("invalid service response: {e}")))
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve exactly one canned HTTP response on an ephemeral local port.
    ///
    /// Reads the full request (headers plus Content-Length body) before
    /// responding so the client never sees a reset mid-write.
    async fn one_shot_server(status: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            let header_end = loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if let Some(pos) = find_header_end(&request) {
                    break pos;
                }
                assert!(n > 0, "connection closed before headers completed");
            };
            let content_length = parse_content_length(&request[..header_end]);
            while request.len() < header_end + content_length {
                let n = socket.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed before body completed");
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{addr}")
    }

    fn find_header_end(bytes: &[u8]) -> Option<usize> {
        bytes
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .map(|pos| pos + 4)
    }

    fn parse_content_length(headers: &[u8]) -> usize {
        String::from_utf8_lossy(headers)
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse().ok())?
            })
            .unwrap_or(0)
    }

    fn auth_body() -> String {
        r#"{"token":"tok_abc","record":{"id":"rec_1","email":"jo@example.com","role":"admin"}}"#
            .to_string()
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let service =
            HttpRecordService::new("http://localhost:8090/", Arc::new(AuthStore::new()));
        assert_eq!(
            service.url("auth-refresh"),
            "http://localhost:8090/api/collections/users/auth-refresh"
        );
    }

    #[tokio::test]
    async fn successful_auth_populates_store() {
        let base = one_shot_server("200 OK", &auth_body()).await;
        let store = Arc::new(AuthStore::new());
        let service = HttpRecordService::new(base, store.clone());

        let auth = service
            .auth_with_password("jo@example.com", "pw123456")
            .await
            .unwrap();

        assert_eq!(auth.token, "tok_abc");
        assert!(store.is_valid());
        assert_eq!(store.model().unwrap().id, "rec_1");
    }

    #[tokio::test]
    async fn rejected_auth_is_classified_by_status() {
        let base = one_shot_server(
            "400 Bad Request",
            r#"{"code":400,"message":"Failed to authenticate.","data":{}}"#,
        )
        .await;
        let store = Arc::new(AuthStore::new());
        let service = HttpRecordService::new(base, store.clone());

        let failure = service
            .auth_with_password("jo@example.com", "wrong")
            .await
            .unwrap_err();

        assert_eq!(failure.status(), Some(400));
        assert!(!store.is_valid(), "failed auth must not touch the store");
    }

    #[tokio::test]
    async fn rejected_create_yields_validation_fields() {
        let base = one_shot_server(
            "400 Bad Request",
            r#"{"code":400,"message":"Failed to create record.","data":{"email":{"code":"validation_invalid_email","message":"Must be a valid email address."}}}"#,
        )
        .await;
        let service = HttpRecordService::new(base, Arc::new(AuthStore::new()));

        let user = NewUser {
            username: "jo123abc".into(),
            email: "not-an-email".into(),
            email_visibility: true,
            password: "pw123456".into(),
            password_confirm: "pw123456".into(),
            name: "Jo".into(),
            role: "customer".into(),
            phone: None,
        };
        let failure = service.create(&user).await.unwrap_err();

        match failure {
            RemoteFailure::Validation { status, fields } => {
                assert_eq!(status, 400);
                assert!(fields.contains_key("email"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn password_reset_accepts_no_content() {
        let base = one_shot_server("204 No Content", "").await;
        let service = HttpRecordService::new(base, Arc::new(AuthStore::new()));
        service
            .request_password_reset("jo@example.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn refresh_without_token_short_circuits() {
        // No server: the call must fail before any network access.
        let store = Arc::new(AuthStore::new());
        let service = HttpRecordService::new("http://localhost:1", store);
        let failure = service.auth_refresh().await.unwrap_err();
        assert_eq!(failure.status(), Some(401));
    }

    #[tokio::test]
    async fn connection_failure_is_transport() {
        // Port 1 is never listening.
        let service =
            HttpRecordService::new("http://127.0.0.1:1", Arc::new(AuthStore::new()));
        let failure = service
            .auth_with_password("jo@example.com", "pw123456")
            .await
            .unwrap_err();
        assert!(matches!(failure, RemoteFailure::Transport(_)));
    }
}
