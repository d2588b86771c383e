// src/notify/mod.rs
pub mod telegram;

use anyhow::Result;

/// Destination identifier for one delivery (a Telegram chat).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Terminal delivery step of the pipeline. Implementations send one body
/// to one destination; the pipeline neither retries nor rolls back.
#[async_trait::async_trait]
pub trait DigestSink: Send + Sync {
    async fn deliver(&self, destination: ChatId, body: &str) -> Result<()>;
}
