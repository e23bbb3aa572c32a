//! Minimal Telegram Bot API client: `getMe`, `getUpdates` and `sendMessage`.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::secrets::bot_api_base;
use crate::error::{Error, Result};

/// Envelope every Bot API method returns.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self, method: &str) -> Result<T> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(Error::Telegram(format!(
                "{method} failed: {}",
                self.description.as_deref().unwrap_or("no description")
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    /// Set for bots and for users who picked one.
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetUpdates<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

/// HTTP client bound to one bot token.
pub struct TelegramClient {
    http: reqwest::Client,
    base: SecretString,
}

impl TelegramClient {
    /// Build a client for `api_url` (e.g. "https://api.telegram.org").
    ///
    /// The HTTP timeout leaves headroom above the long-poll timeout.
    pub fn new(api_url: &str, token: &SecretString, poll_timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + 10))
            .build()?;
        Ok(Self {
            http,
            base: bot_api_base(api_url, token),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.base.expose_secret())
    }

    /// The bot's own account, used to recognize `/verb@username` commands.
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates newer than `offset`.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let body = GetUpdates {
            offset,
            timeout: timeout_secs,
            allowed_updates: &["message"],
        };
        self.call("getUpdates", &body).await
    }

    /// Send a plain-text message to `chat_id`.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let body = SendMessage { chat_id, text };
        let _sent: serde_json::Value = self.call("sendMessage", &body).await?;
        Ok(())
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        // reqwest errors carry the URL, which embeds the token.
        let response = self
            .http
            .post(self.url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Telegram(format!("{method} request failed: {}", e.without_url())))?;

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| Error::Telegram(format!("{method} bad response: {}", e.without_url())))?;
        envelope.into_result(method)
    }
}
