// src/fetch/github.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Deserialize;
use std::time::Duration;

use crate::config::Window;
use crate::fetch::types::{CandidateProvider, RepoCandidate};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("github-trending-digest/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    name: String,
    full_name: String,
    description: Option<String>,
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    stargazers_count: u64,
    html_url: String,
    created_at: DateTime<Utc>,
}

impl From<SearchItem> for RepoCandidate {
    fn from(it: SearchItem) -> Self {
        RepoCandidate {
            name: it.name,
            full_name: it.full_name,
            description: it.description,
            language: it.language,
            topics: it.topics,
            stars: it.stargazers_count,
            url: it.html_url,
            created_at: it.created_at,
        }
    }
}

/// Search-API client for "repositories created after the cutoff, by stars".
pub struct GithubSearchProvider {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
    per_page: usize,
}

impl GithubSearchProvider {
    /// `per_page` should match the configured pool size; the search API
    /// otherwise defaults to a 30-item page and silently shrinks the pool.
    pub fn new(per_page: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            token: std::env::var("GITHUB_TOKEN").ok(),
            per_page,
        }
    }

    /// Point the provider at a stub server (tests).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn cutoff_date(window: Window, now: DateTime<Utc>) -> String {
        (now - ChronoDuration::days(window.days()))
            .format("%Y-%m-%d")
            .to_string()
    }
}

#[async_trait]
impl CandidateProvider for GithubSearchProvider {
    async fn fetch_window(&self, window: Window) -> Result<Vec<RepoCandidate>> {
        let cutoff = Self::cutoff_date(window, Utc::now());
        let url = format!("{}/search/repositories", self.api_base);

        let mut req = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .query(&[
                ("q", format!("created:>{cutoff}")),
                ("sort", "stars".to_string()),
                ("order", "desc".to_string()),
                ("per_page", self.per_page.to_string()),
            ]);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.context("github search get()")?;
        let resp = resp
            .error_for_status()
            .context("github search non-2xx")?;
        let body: SearchResponse = resp.json().await.context("github search json")?;

        Ok(body.items.into_iter().map(RepoCandidate::from).collect())
    }

    fn name(&self) -> &'static str {
        "GitHubSearch"
    }
}
