// src/notify/telegram.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ChatId, DigestSink};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";
const SEND_TIMEOUT_SECS: u64 = 10;

pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_TARGET_CHAT_ID: &str = "TARGET_CHAT_ID";

/// Default destination for scheduled runs, if one is configured at all.
/// Before the first manual contact there may be none; scheduled runs are
/// then skipped with a warning.
pub fn default_destination_from_env() -> Option<ChatId> {
    std::env::var(ENV_TARGET_CHAT_ID)
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(ChatId)
}

/// Bot API client: outbound `sendMessage` plus the `getUpdates` long poll
/// consumed by the command listener.
#[derive(Clone)]
pub struct TelegramBot {
    token: String,
    client: Client,
    api_base: String,
}

impl TelegramBot {
    pub fn new(token: String) -> Self {
        Self {
            token,
            client: Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let token = std::env::var(ENV_BOT_TOKEN)
            .map_err(|_| anyhow!("{ENV_BOT_TOKEN} missing"))?;
        Ok(Self::new(token))
    }

    /// Point the client at a stub server (tests).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// Send one Markdown message with link previews suppressed. One
    /// attempt; the caller decides what a failure means.
    pub async fn send_message(&self, chat: ChatId, text: &str) -> Result<()> {
        let body = SendMessageBody {
            chat_id: chat.0,
            text,
            parse_mode: "Markdown",
            disable_web_page_preview: true,
        };

        let resp = self
            .client
            .post(self.method_url("sendMessage"))
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .json(&body)
            .send()
            .await
            .context("telegram sendMessage post")?
            .error_for_status()
            .context("telegram sendMessage non-2xx")?;

        let reply: ApiReply<serde_json::Value> =
            resp.json().await.context("telegram sendMessage json")?;
        if !reply.ok {
            return Err(anyhow!(
                "telegram sendMessage rejected: {}",
                reply.description.unwrap_or_default()
            ));
        }
        Ok(())
    }

    /// Long-poll for updates past `offset`. Blocks up to `timeout_secs`
    /// server-side; an empty list on timeout is normal.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let mut query: Vec<(&str, String)> = vec![("timeout", timeout_secs.to_string())];
        if let Some(off) = offset {
            query.push(("offset", off.to_string()));
        }

        let resp = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&query)
            .send()
            .await
            .context("telegram getUpdates get")?
            .error_for_status()
            .context("telegram getUpdates non-2xx")?;

        let reply: ApiReply<Vec<Update>> =
            resp.json().await.context("telegram getUpdates json")?;
        if !reply.ok {
            return Err(anyhow!(
                "telegram getUpdates rejected: {}",
                reply.description.unwrap_or_default()
            ));
        }
        Ok(reply.result.unwrap_or_default())
    }
}

#[async_trait]
impl DigestSink for TelegramBot {
    async fn deliver(&self, destination: ChatId, body: &str) -> Result<()> {
        self.send_message(destination, body).await
    }
}

#[derive(Serialize)]
struct SendMessageBody<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct ApiReply<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}
