//! Telegram Bot API messenger.

use super::Messenger;
use crate::config::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_TELEGRAM_API_URL};
use crate::error::{RelayError, Result, truncate_body};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_NAME: &str = "Telegram Bot API";

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct Reply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages to one chat through `sendMessage`.
///
/// # Examples
///
/// ```rust,no_run
/// use homework_relay::messenger::{Messenger, TelegramMessenger};
///
/// # fn example() -> homework_relay::error::Result<()> {
/// let bot = TelegramMessenger::builder()
///     .with_token("123456:ABC-DEF")
///     .with_chat_id("987654321")
///     .build()?;
/// bot.send("hello")?;
/// # Ok(())
/// # }
/// ```
pub struct TelegramMessenger {
    api_url: String,
    token: String,
    chat_id: String,
    client: Client,
}

impl TelegramMessenger {
    /// Create a new builder for constructing a messenger.
    pub fn builder() -> TelegramMessengerBuilder {
        TelegramMessengerBuilder::new()
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token)
    }
}

impl Messenger for TelegramMessenger {
    fn send(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(RelayError::Delivery("refusing to send an empty message".to_string()));
        }

        let response = self
            .client
            .post(self.endpoint())
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            // The URL carries the bot token; keep it out of logs.
            .map_err(|e| RelayError::Request {
                api: API_NAME,
                details: e.without_url().to_string(),
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| RelayError::Request {
            api: API_NAME,
            details: format!("failed to read response body: {}", e.without_url()),
        })?;

        read_reply(status, &body)?;
        tracing::debug!(chat_id = %self.chat_id, "message sent: {}", text);
        Ok(())
    }

    fn name(&self) -> String {
        format!("telegram:{}", self.chat_id)
    }
}

fn read_reply(status: StatusCode, body: &str) -> Result<()> {
    let reply = serde_json::from_str::<Reply>(body).ok();

    if !status.is_success() {
        let body = reply
            .and_then(|r| r.description)
            .unwrap_or_else(|| truncate_body(body));
        return Err(RelayError::HttpStatus {
            api: API_NAME,
            status: status.as_u16(),
            body,
        });
    }

    match reply {
        Some(Reply { ok: true, .. }) => Ok(()),
        Some(Reply {
            ok: false,
            description,
        }) => Err(RelayError::Delivery(
            description.unwrap_or_else(|| "Telegram rejected the message".to_string()),
        )),
        None => Err(RelayError::Delivery(format!(
            "unexpected reply from {}: {}",
            API_NAME,
            truncate_body(body)
        ))),
    }
}

/// Builder for constructing a [`TelegramMessenger`].
pub struct TelegramMessengerBuilder {
    api_url: String,
    token: Option<String>,
    chat_id: Option<String>,
    timeout: Duration,
}

impl TelegramMessengerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            token: None,
            chat_id: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the Bot API base URL (useful for a local Bot API server).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the bot token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the destination chat.
    pub fn with_chat_id(mut self, chat_id: impl Into<String>) -> Self {
        self.chat_id = Some(chat_id.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the messenger.
    ///
    /// # Errors
    ///
    /// Returns an error if the token or chat id is missing, or the HTTP client
    /// cannot be constructed.
    pub fn build(self) -> Result<TelegramMessenger> {
        let token = self.token.ok_or_else(|| {
            RelayError::InvalidConfig("a bot token is required for TelegramMessenger".to_string())
        })?;
        let chat_id = self.chat_id.ok_or_else(|| {
            RelayError::InvalidConfig("a chat id is required for TelegramMessenger".to_string())
        })?;

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                RelayError::InvalidConfig(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(TelegramMessenger {
            api_url: self.api_url.trim_end_matches('/').to_string(),
            token,
            chat_id,
            client,
        })
    }
}

impl Default for TelegramMessengerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messenger() -> TelegramMessenger {
        TelegramMessenger::builder()
            .with_api_url("http://localhost:8081/")
            .with_token("123:abc")
            .with_chat_id("42")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder() {
        let bot = messenger();
        assert_eq!(bot.endpoint(), "http://localhost:8081/bot123:abc/sendMessage");
        assert_eq!(bot.name(), "telegram:42");
    }

    #[test]
    fn test_builder_requires_token_and_chat() {
        assert!(TelegramMessenger::builder().with_chat_id("1").build().is_err());
        assert!(TelegramMessenger::builder().with_token("t").build().is_err());
    }

    #[test]
    fn test_empty_message_refused() {
        let err = messenger().send("  \n").unwrap_err();
        assert!(matches!(err, RelayError::Delivery(_)));
    }

    #[test]
    fn test_payload_shape() {
        let payload = serde_json::to_value(SendMessage {
            chat_id: "42",
            text: "hi",
        })
        .unwrap();
        assert_eq!(payload, serde_json::json!({"chat_id": "42", "text": "hi"}));
    }

    #[test]
    fn test_send_posts_json_to_bot_endpoint() {
        let (base, server) = crate::test_server::serve_once(
            "200 OK",
            r#"{"ok": true, "result": {"message_id": 5}}"#,
        );
        let bot = TelegramMessenger::builder()
            .with_api_url(base)
            .with_token("123:abc")
            .with_chat_id("42")
            .build()
            .unwrap();

        bot.send("Review status changed").unwrap();
        let request = server.join().unwrap();

        assert_eq!(request.request_line(), "POST /bot123:abc/sendMessage HTTP/1.1");
        assert_eq!(request.header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"chat_id": "42", "text": "Review status changed"})
        );
    }

    #[test]
    fn test_send_surfaces_telegram_rejection() {
        let (base, server) = crate::test_server::serve_once(
            "400 Bad Request",
            r#"{"ok": false, "error_code": 400, "description": "Bad Request: message is too long"}"#,
        );
        let bot = TelegramMessenger::builder()
            .with_api_url(base)
            .with_token("123:abc")
            .with_chat_id("42")
            .build()
            .unwrap();

        let err = bot.send("hi").unwrap_err();
        server.join().unwrap();

        assert!(err.to_string().contains("message is too long"));
        assert!(!err.to_string().contains("123:abc"));
    }

    #[test]
    fn test_read_reply_ok() {
        assert!(read_reply(StatusCode::OK, r#"{"ok": true, "result": {"message_id": 1}}"#).is_ok());
    }

    #[test]
    fn test_read_reply_rejected() {
        let err = read_reply(
            StatusCode::BAD_REQUEST,
            r#"{"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}"#,
        )
        .unwrap_err();
        match err {
            RelayError::HttpStatus { status, body, .. } => {
                assert_eq!(status, 400);
                assert_eq!(body, "Bad Request: chat not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_read_reply_not_ok() {
        let err =
            read_reply(StatusCode::OK, r#"{"ok": false, "description": "flood"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Failed to deliver message: flood");
    }

    #[test]
    fn test_read_reply_garbage() {
        let err = read_reply(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, RelayError::Delivery(_)));
    }
}
