// src/fetch/mod.rs
pub mod github;
pub mod types;

use metrics::counter;

use crate::config::Window;
use crate::fetch::types::{CandidateProvider, RepoCandidate};

/// Fetch candidates for the window, degrading every failure to an empty
/// list. An empty result means "nothing to report this run", never a hard
/// error; the provider's failure stops at this boundary.
pub async fn fetch_candidates(
    provider: &dyn CandidateProvider,
    window: Window,
) -> Vec<RepoCandidate> {
    match provider.fetch_window(window).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = ?e, provider = provider.name(), "candidate fetch failed");
            counter!("digest_fetch_errors_total").increment(1);
            Vec::new()
        }
    }
}
