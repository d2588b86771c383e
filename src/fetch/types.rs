// src/fetch/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::config::Window;

/// One repository returned by the search endpoint. Immutable for the
/// lifetime of a single pipeline run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct RepoCandidate {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub stars: u64,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait CandidateProvider: Send + Sync {
    /// Fetch candidates created within the window, ordered by the API's
    /// popularity ranking (highest-starred first).
    async fn fetch_window(&self, window: Window) -> Result<Vec<RepoCandidate>>;
    fn name(&self) -> &'static str;
}
