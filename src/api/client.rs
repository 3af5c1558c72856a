//! HTTP client for the homework statuses API.

use super::{StatusPage, check_response};
use crate::config::{DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT};
use crate::error::{RelayError, Result, ValidationError, truncate_body};
use crate::relay::Checkpoint;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde_json::Value as JsonValue;
use std::time::Duration;

const API_NAME: &str = "homework statuses API";

/// Source of homework status updates.
///
/// Implemented by [`PracticumClient`] for the real service; tests substitute
/// in-memory fakes.
pub trait HomeworkApi {
    /// Fetch every record whose status changed since `since`.
    ///
    /// # Errors
    ///
    /// Network failures, non-success statuses and malformed bodies are all
    /// reported as errors; none of them is fatal to the caller.
    fn fetch(&self, since: Checkpoint) -> Result<StatusPage>;

    /// Get a human-readable name for this API (for logging/debugging).
    fn name(&self) -> String;
}

/// Client for the Practicum homework statuses endpoint.
///
/// Sends `GET <endpoint>?from_date=<checkpoint>` authorised with an OAuth token.
///
/// # Examples
///
/// ```rust,no_run
/// use homework_relay::api::PracticumClient;
/// use std::time::Duration;
///
/// # fn example() -> homework_relay::error::Result<()> {
/// let client = PracticumClient::builder()
///     .with_token("y0_secret")
///     .with_timeout(Duration::from_secs(5))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct PracticumClient {
    url: String,
    client: Client,
    auth: HeaderValue,
}

impl PracticumClient {
    /// Create a new builder for constructing a client.
    pub fn builder() -> PracticumClientBuilder {
        PracticumClientBuilder::new()
    }
}

impl HomeworkApi for PracticumClient {
    fn fetch(&self, since: Checkpoint) -> Result<StatusPage> {
        tracing::debug!(
            url = %self.url,
            from_date = since.as_secs(),
            "requesting homework statuses"
        );

        let response = self
            .client
            .get(&self.url)
            .header(AUTHORIZATION, self.auth.clone())
            .query(&[("from_date", since.as_secs())])
            .send()
            .map_err(|e| RelayError::Request {
                api: API_NAME,
                details: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| RelayError::Request {
            api: API_NAME,
            details: format!("failed to read response body: {}", e),
        })?;

        read_page(status, &body)
    }

    fn name(&self) -> String {
        format!("practicum:{}", self.url)
    }
}

/// Turn a raw HTTP answer into a validated page.
fn read_page(status: StatusCode, body: &str) -> Result<StatusPage> {
    if !status.is_success() {
        return Err(RelayError::HttpStatus {
            api: API_NAME,
            status: status.as_u16(),
            body: truncate_body(body),
        });
    }

    let json: JsonValue = serde_json::from_str(body).map_err(|e| {
        RelayError::invalid_response(
            API_NAME,
            ValidationError::custom(format!(
                "body is not valid JSON ({}): {}",
                e,
                truncate_body(body)
            )),
        )
    })?;

    check_response(&json).map_err(|e| RelayError::invalid_response(API_NAME, e))
}

/// Builder for constructing a [`PracticumClient`].
pub struct PracticumClientBuilder {
    url: String,
    token: Option<String>,
    timeout: Duration,
}

impl PracticumClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            token: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the statuses endpoint.
    ///
    /// Defaults to the public Practicum endpoint.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the OAuth token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout.
    ///
    /// Default is 10 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No token is provided, or it cannot be used as a header value
    /// - The HTTP client cannot be constructed
    pub fn build(self) -> Result<PracticumClient> {
        let token = self.token.ok_or_else(|| {
            RelayError::InvalidConfig("a token is required for PracticumClient".to_string())
        })?;

        let mut auth = HeaderValue::from_str(&format!("OAuth {}", token))
            .map_err(|e| RelayError::InvalidConfig(format!("Invalid OAuth token: {}", e)))?;
        auth.set_sensitive(true);

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                RelayError::InvalidConfig(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(PracticumClient {
            url: self.url,
            client,
            auth,
        })
    }
}

impl Default for PracticumClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HomeworkStatus;

    #[test]
    fn test_builder() {
        let client = PracticumClient::builder()
            .with_url("https://example.com/statuses")
            .with_token("token123")
            .with_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(client.url, "https://example.com/statuses");
        assert_eq!(client.auth.to_str().unwrap(), "OAuth token123");
        assert!(client.auth.is_sensitive());
        assert_eq!(client.name(), "practicum:https://example.com/statuses");
    }

    #[test]
    fn test_builder_defaults_to_practicum() {
        let client = PracticumClient::builder().with_token("t").build().unwrap();
        assert_eq!(client.url, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_builder_no_token() {
        assert!(PracticumClient::builder().build().is_err());
    }

    #[test]
    fn test_builder_rejects_unprintable_token() {
        let result = PracticumClient::builder().with_token("bad\ntoken").build();
        assert!(matches!(result, Err(RelayError::InvalidConfig(_))));
    }

    #[test]
    fn test_fetch_sends_checkpoint_and_oauth_header() {
        let (base, server) = crate::test_server::serve_once(
            "200 OK",
            r#"{"homeworks": [{"id": 9, "homework_name": "hw.zip", "status": "approved"}], "current_date": 1700000600}"#,
        );
        let client = PracticumClient::builder()
            .with_url(format!("{}/api/user_api/homework_statuses/", base))
            .with_token("y0_secret")
            .build()
            .unwrap();

        let page = client.fetch(Checkpoint::from_secs(1700000000)).unwrap();
        let request = server.join().unwrap();

        assert_eq!(
            request.request_line(),
            "GET /api/user_api/homework_statuses/?from_date=1700000000 HTTP/1.1"
        );
        assert_eq!(request.header("authorization"), Some("OAuth y0_secret"));
        assert!(request.body.is_empty());
        assert_eq!(page.homeworks[0].status, HomeworkStatus::Approved);
        assert_eq!(page.current_date, Checkpoint::from_secs(1700000600));
    }

    #[test]
    fn test_fetch_reports_http_status() {
        let (base, server) =
            crate::test_server::serve_once("503 Service Unavailable", r#"{"detail": "down"}"#);
        let client = PracticumClient::builder()
            .with_url(base)
            .with_token("t")
            .build()
            .unwrap();

        let err = client.fetch(Checkpoint::from_secs(0)).unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, RelayError::HttpStatus { status: 503, .. }));
    }

    #[test]
    fn test_read_page_ok() {
        let page = read_page(
            StatusCode::OK,
            r#"{"homeworks": [{"id": 7, "homework_name": "hw.zip", "status": "reviewing"}], "current_date": 1700000000}"#,
        )
        .unwrap();
        assert_eq!(page.homeworks.len(), 1);
        assert_eq!(page.homeworks[0].status, HomeworkStatus::Reviewing);
        assert_eq!(page.current_date, Checkpoint::from_secs(1700000000));
    }

    #[test]
    fn test_read_page_http_status() {
        let err = read_page(
            StatusCode::UNAUTHORIZED,
            r#"{"code": "not_authenticated", "message": "Учетные данные не были предоставлены."}"#,
        )
        .unwrap_err();
        match err {
            RelayError::HttpStatus { status, body, .. } => {
                assert_eq!(status, 401);
                assert!(body.contains("not_authenticated"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_read_page_not_json() {
        let err = read_page(StatusCode::OK, "<html>maintenance</html>").unwrap_err();
        assert!(matches!(err, RelayError::InvalidResponse { .. }));
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_read_page_wrong_shape() {
        let err = read_page(StatusCode::OK, r#"{"homeworks": []}"#).unwrap_err();
        match err {
            RelayError::InvalidResponse { source, .. } => {
                assert_eq!(source, ValidationError::missing_field("current_date"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
