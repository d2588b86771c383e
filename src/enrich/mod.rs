// src/enrich/mod.rs
//! Per-candidate enrichment: description resolution (placeholder /
//! translation / silent fallback), truncation, smart tags, icon lookup,
//! and star-count formatting.
//!
//! Each candidate is enriched in isolation; a translation failure degrades
//! that one entry to its untranslated text and never reaches the caller.

pub mod tags;
pub mod translate;

use metrics::counter;
use std::collections::{HashMap, HashSet};

use crate::config::DigestConfig;
use crate::enrich::translate::Translator;
use crate::fetch::types::RepoCandidate;

/// Appended when a description is cut; 3 chars, counted against the limit.
const ELLIPSIS: &str = "...";

/// One rendered-ready digest row, derived from exactly one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestEntry {
    /// 1-based, assigned by sample order (not star rank).
    pub rank: usize,
    pub name: String,
    pub description: String,
    pub stats: String,
    pub tags: String,
    pub link: String,
}

/// How an entry's description text was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionOutcome {
    /// Candidate had no description; the placeholder was used verbatim.
    Placeholder,
    Translated,
    /// Translation failed; the untranslated text was kept.
    Untranslated { reason: String },
}

pub struct Enricher {
    translator: Box<dyn Translator>,
    target_locale: String,
    placeholder_desc: String,
    unknown_language: String,
    desc_limit: usize,
    default_icon: String,
    /// Lowercased language name → icon.
    language_icons: HashMap<String, String>,
    /// Lowercased priority topics.
    priority_tags: HashSet<String>,
}

impl Enricher {
    /// Tables come from configuration, normalized to lowercase keys here so
    /// lookups stay case-insensitive.
    pub fn new(cfg: &DigestConfig, translator: Box<dyn Translator>) -> Self {
        Self {
            translator,
            target_locale: cfg.target_locale.clone(),
            placeholder_desc: cfg.placeholder_desc.clone(),
            unknown_language: cfg.unknown_language.clone(),
            desc_limit: cfg.desc_limit,
            default_icon: cfg.default_icon.clone(),
            language_icons: cfg
                .language_icons
                .iter()
                .map(|(k, v)| (k.to_lowercase(), v.clone()))
                .collect(),
            priority_tags: cfg.priority_tags.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Enrich every sampled candidate, in input order.
    pub async fn enrich_all(&self, sampled: &[RepoCandidate]) -> Vec<DigestEntry> {
        let mut out = Vec::with_capacity(sampled.len());
        for (i, candidate) in sampled.iter().enumerate() {
            out.push(self.enrich_one(i + 1, candidate).await);
        }
        out
    }

    pub async fn enrich_one(&self, rank: usize, candidate: &RepoCandidate) -> DigestEntry {
        let (description, _outcome) = self.resolve_description(candidate).await;
        let description = truncate_description(&description, self.desc_limit);

        let language = candidate
            .language
            .as_deref()
            .unwrap_or(&self.unknown_language);
        let icon = self.icon_for(language);
        let tag_list = tags::smart_tags(&candidate.topics, language, &self.priority_tags);

        DigestEntry {
            rank,
            name: candidate.name.clone(),
            description,
            stats: format!("🌟 {} Stars", format_star_count(candidate.stars)),
            tags: format!("{icon} {tag_list}"),
            link: candidate.url.clone(),
        }
    }

    /// Resolve the raw description text: placeholder when missing (no
    /// translation attempted), translated when possible, untranslated on
    /// translation failure.
    pub async fn resolve_description(
        &self,
        candidate: &RepoCandidate,
    ) -> (String, DescriptionOutcome) {
        let Some(original) = candidate.description.as_deref() else {
            return (self.placeholder_desc.clone(), DescriptionOutcome::Placeholder);
        };

        match self.translator.translate(original, &self.target_locale).await {
            Ok(translated) => (translated, DescriptionOutcome::Translated),
            Err(e) => {
                tracing::warn!(
                    error = ?e,
                    repo = %candidate.full_name,
                    "translation failed, keeping original text"
                );
                counter!("digest_translate_fallback_total").increment(1);
                (
                    original.to_string(),
                    DescriptionOutcome::Untranslated {
                        reason: format!("{e:#}"),
                    },
                )
            }
        }
    }

    /// Pure, total lookup: unknown languages get the default icon.
    pub fn icon_for(&self, language: &str) -> &str {
        self.language_icons
            .get(&language.to_lowercase())
            .unwrap_or(&self.default_icon)
    }
}

/// Cap `s` at `limit` chars; longer text is cut to `limit - 3` chars plus a
/// 3-char ellipsis, so the result is exactly `limit` chars. Counts `char`s,
/// not bytes: descriptions routinely come back as CJK text.
pub fn truncate_description(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        return s.to_string();
    }
    let mut out: String = s.chars().take(limit - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Render a star count with `,` grouping: 1234567 → "1,234,567".
pub fn format_star_count(stars: u64) -> String {
    let digits = stars.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
