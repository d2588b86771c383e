// src/pipeline.rs
//! One digest run: fetch → sample → enrich → format → deliver.
//!
//! The destination is an explicit per-invocation argument (scheduled runs
//! pass the configured default, on-demand runs pass the caller's chat id),
//! so concurrent triggers never share mutable delivery state.

use chrono::Utc;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;

use crate::config::DigestConfig;
use crate::enrich::translate::Translator;
use crate::enrich::Enricher;
use crate::fetch::{self, types::CandidateProvider};
use crate::format::{render_digest, Digest};
use crate::notify::{ChatId, DigestSink};
use crate::sampler;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("digest_runs_total", "Pipeline invocations, any outcome.");
        describe_counter!(
            "digest_entries_total",
            "Digest entries delivered across all runs."
        );
        describe_counter!(
            "digest_fetch_errors_total",
            "Candidate search failures degraded to empty runs."
        );
        describe_counter!(
            "digest_translate_fallback_total",
            "Entries that fell back to their untranslated description."
        );
        describe_counter!("digest_delivery_errors_total", "Failed delivery attempts.");
        describe_gauge!("digest_last_run_ts", "Unix ts when the pipeline last ran.");
    });
}

/// How one run ended. Degraded endings are normal operation, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Delivered { entries: usize },
    /// Fetch came back empty (or sampling was configured down to zero);
    /// nothing rendered, nothing delivered.
    NothingToReport,
    /// Digest was built but the sink rejected it. No retry.
    DeliveryFailed,
}

pub struct DigestPipeline {
    cfg: DigestConfig,
    provider: Box<dyn CandidateProvider>,
    enricher: Enricher,
    sink: Box<dyn DigestSink>,
}

impl DigestPipeline {
    pub fn new(
        cfg: DigestConfig,
        provider: Box<dyn CandidateProvider>,
        translator: Box<dyn Translator>,
        sink: Box<dyn DigestSink>,
    ) -> Self {
        let enricher = Enricher::new(&cfg, translator);
        Self {
            cfg,
            provider,
            enricher,
            sink,
        }
    }

    pub fn config(&self) -> &DigestConfig {
        &self.cfg
    }

    /// Run the whole pipeline once, delivering to `destination`.
    pub async fn run(&self, destination: ChatId) -> RunOutcome {
        ensure_metrics_described();
        counter!("digest_runs_total").increment(1);

        let fetched = fetch::fetch_candidates(self.provider.as_ref(), self.cfg.window).await;
        if fetched.is_empty() {
            tracing::info!("no candidates this run, skipping delivery");
            return RunOutcome::NothingToReport;
        }

        // Scoped so the thread-local RNG is dropped before the next await.
        let sampled = {
            let mut rng = rand::rng();
            sampler::sample_candidates(&fetched, self.cfg.pool_size, self.cfg.sample_size, &mut rng)
        };
        if sampled.is_empty() {
            tracing::info!("sampling produced no entries, skipping delivery");
            return RunOutcome::NothingToReport;
        }

        let entries = self.enricher.enrich_all(&sampled).await;
        let digest = Digest {
            window: self.cfg.window,
            generated_at: Utc::now(),
            entries,
        };
        let body = render_digest(&digest);

        gauge!("digest_last_run_ts").set(Utc::now().timestamp().max(0) as f64);

        match self.sink.deliver(destination, &body).await {
            Ok(()) => {
                let n = digest.entries.len();
                counter!("digest_entries_total").increment(n as u64);
                tracing::info!(entries = n, %destination, "digest delivered");
                RunOutcome::Delivered { entries: n }
            }
            Err(e) => {
                tracing::warn!(error = ?e, %destination, "digest delivery failed");
                counter!("digest_delivery_errors_total").increment(1);
                RunOutcome::DeliveryFailed
            }
        }
    }
}
