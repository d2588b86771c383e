// src/enrich/translate.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;

const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target`, auto-detecting the source language.
    async fn translate(&self, text: &str, target: &str) -> Result<String>;
}

/// Client for the public Google translate endpoint (`client=gtx`).
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleTranslator {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Point the translator at a stub server (tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The payload is a nested array; the first element lists translated
    /// segments as `[translated, source, ...]` pairs.
    fn parse_translation(v: &serde_json::Value) -> Result<String> {
        let segments = v
            .get(0)
            .and_then(|s| s.as_array())
            .ok_or_else(|| anyhow!("unexpected translate payload shape"))?;

        let mut out = String::new();
        for seg in segments {
            if let Some(part) = seg.get(0).and_then(|p| p.as_str()) {
                out.push_str(part);
            }
        }
        if out.is_empty() {
            return Err(anyhow!("translate payload had no segments"));
        }
        Ok(out)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .context("translate get()")?
            .error_for_status()
            .context("translate non-2xx")?;

        let body: serde_json::Value = resp.json().await.context("translate json")?;
        Self::parse_translation(&body)
    }
}
