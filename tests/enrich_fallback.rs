// tests/enrich_fallback.rs
//
// Enrichment failure isolation: a translation failure degrades only its
// own entry, and a missing description never reaches the translator.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use github_trending_digest::config::DigestConfig;
use github_trending_digest::enrich::translate::Translator;
use github_trending_digest::enrich::{DescriptionOutcome, Enricher};
use github_trending_digest::fetch::types::RepoCandidate;

fn mk_candidate(name: &str, description: Option<&str>) -> RepoCandidate {
    RepoCandidate {
        name: name.to_string(),
        full_name: format!("acme/{name}"),
        description: description.map(str::to_string),
        language: Some("Python".to_string()),
        topics: Vec::new(),
        stars: 100,
        url: format!("https://github.com/acme/{name}"),
        created_at: Utc.with_ymd_and_hms(2025, 3, 8, 0, 0, 0).unwrap(),
    }
}

/// Fails on any text containing the marker; counts every call.
struct FlakyTranslator {
    fail_marker: &'static str,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Translator for FlakyTranslator {
    async fn translate(&self, text: &str, _target: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.contains(self.fail_marker) {
            return Err(anyhow!("simulated translate outage"));
        }
        Ok(format!("[zh] {text}"))
    }
}

fn enricher_with(calls: Arc<AtomicUsize>) -> Enricher {
    Enricher::new(
        &DigestConfig::default(),
        Box::new(FlakyTranslator {
            fail_marker: "UNTRANSLATABLE",
            calls,
        }),
    )
}

#[tokio::test]
async fn translation_failure_falls_back_to_original_for_that_entry_only() {
    let calls = Arc::new(AtomicUsize::new(0));
    let enricher = enricher_with(calls.clone());

    let batch = vec![
        mk_candidate("ok-1", Some("first description")),
        mk_candidate("broken", Some("UNTRANSLATABLE description")),
        mk_candidate("ok-2", Some("second description")),
    ];
    let entries = enricher.enrich_all(&batch).await;

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].description, "[zh] first description");
    // Failed entry keeps its untranslated text verbatim.
    assert_eq!(entries[1].description, "UNTRANSLATABLE description");
    assert_eq!(entries[2].description, "[zh] second description");
}

#[tokio::test]
async fn missing_description_uses_placeholder_without_calling_the_translator() {
    let calls = Arc::new(AtomicUsize::new(0));
    let enricher = enricher_with(calls.clone());

    let candidate = mk_candidate("silent", None);
    let (text, outcome) = enricher.resolve_description(&candidate).await;

    assert_eq!(outcome, DescriptionOutcome::Placeholder);
    assert_eq!(text, DigestConfig::default().placeholder_desc);
    assert_eq!(calls.load(Ordering::SeqCst), 0, "translator must not be called");
}

#[tokio::test]
async fn resolve_description_reports_each_outcome() {
    let calls = Arc::new(AtomicUsize::new(0));
    let enricher = enricher_with(calls.clone());

    let (_, ok) = enricher
        .resolve_description(&mk_candidate("a", Some("fine")))
        .await;
    assert_eq!(ok, DescriptionOutcome::Translated);

    let (text, failed) = enricher
        .resolve_description(&mk_candidate("b", Some("UNTRANSLATABLE")))
        .await;
    assert_eq!(text, "UNTRANSLATABLE");
    assert!(matches!(failed, DescriptionOutcome::Untranslated { .. }));
}

#[tokio::test]
async fn enriched_description_is_truncated_to_the_configured_limit() {
    let calls = Arc::new(AtomicUsize::new(0));
    let enricher = enricher_with(calls.clone());
    let limit = DigestConfig::default().desc_limit;

    let long = "word ".repeat(60);
    let entry = enricher
        .enrich_one(1, &mk_candidate("long", Some(&long)))
        .await;

    assert_eq!(entry.description.chars().count(), limit);
    assert!(entry.description.ends_with("..."));
}
