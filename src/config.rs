// src/config.rs
//! Digest configuration: lookback window, sampling bounds, enrichment
//! tables, and the delivery schedule.
//!
//! - Loads from TOML (`$DIGEST_CONFIG_PATH` → `config/digest.toml`).
//! - Falls back to a built-in `default_seed()` when no file is present.
//! - Partial files work: every field has a seeded default.
//! - Credentials and the default chat id live in the environment, never here.

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveTime, Weekday};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/digest.toml";
pub const ENV_CONFIG_PATH: &str = "DIGEST_CONFIG_PATH";

/// Truncation shorter than this cannot hold the ellipsis marker plus any text.
const MIN_DESC_LIMIT: usize = 8;

/// Lookback window defining "recently created".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Daily,
    Weekly,
}

impl Window {
    pub fn days(self) -> i64 {
        match self {
            Window::Daily => 1,
            Window::Weekly => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Window::Daily => "Daily",
            Window::Weekly => "Weekly",
        }
    }

    /// Phrase used in the digest header.
    pub fn period_phrase(self) -> &'static str {
        match self {
            Window::Daily => "today",
            Window::Weekly => "this week",
        }
    }
}

/// When the scheduled trigger fires, in UTC.
/// `weekday = None` means every day at `at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSpec {
    pub weekday: Option<Weekday>,
    pub at: NaiveTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Lookback window for candidate retrieval.
    pub window: Window,
    /// How many of the top fetched candidates are eligible for sampling.
    pub pool_size: usize,
    /// How many candidates one digest actually contains.
    pub sample_size: usize,
    /// Hard cap on the enriched description length, marker included.
    pub desc_limit: usize,
    /// Translation target for descriptions (BCP-47-ish, per the translate API).
    pub target_locale: String,
    /// Substitute text when a repository has no description.
    pub placeholder_desc: String,
    /// Label for candidates without a primary language; doubles as the
    /// tag fallback when a candidate has no topics either.
    pub unknown_language: String,
    /// Icon for languages absent from `language_icons`.
    pub default_icon: String,
    /// Topics ranked ahead of everything else in the tag display.
    pub priority_tags: Vec<String>,
    /// Primary language → display icon.
    pub language_icons: HashMap<String, String>,
    /// Weekday the scheduled run fires on (weekly window only).
    schedule_weekday: Option<String>,
    /// Time of day the scheduled run fires, "HH:MM" in UTC.
    schedule_time: String,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl DigestConfig {
    /// Load configuration from an explicit TOML path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading digest config from {}", path.display()))?;
        let cfg: DigestConfig = toml::from_str(&content)
            .with_context(|| format!("parsing digest config {}", path.display()))?;
        cfg.validated()
    }

    /// Load configuration using env var + fallbacks:
    /// 1) $DIGEST_CONFIG_PATH (must exist if set)
    /// 2) config/digest.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("DIGEST_CONFIG_PATH points to non-existent path"));
        }
        let toml_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        Ok(Self::default_seed())
    }

    /// Parsed schedule. The weekday only applies to the weekly window;
    /// a daily digest fires every day at `schedule_time`.
    pub fn schedule(&self) -> Result<ScheduleSpec> {
        let at = NaiveTime::parse_from_str(&self.schedule_time, "%H:%M")
            .with_context(|| format!("parsing schedule_time {:?}", self.schedule_time))?;
        let weekday = match self.window {
            Window::Daily => None,
            Window::Weekly => match &self.schedule_weekday {
                Some(s) => Some(
                    s.parse::<Weekday>()
                        .map_err(|_| anyhow!("unknown schedule_weekday {:?}", s))?,
                ),
                None => None,
            },
        };
        Ok(ScheduleSpec { weekday, at })
    }

    /// Normalize and reject configurations the pipeline cannot honor.
    fn validated(mut self) -> Result<Self> {
        if self.desc_limit < MIN_DESC_LIMIT {
            return Err(anyhow!(
                "desc_limit {} is below the minimum of {}",
                self.desc_limit,
                MIN_DESC_LIMIT
            ));
        }
        // Sampling never requests more items than the pool can hold.
        if self.sample_size > self.pool_size {
            self.sample_size = self.pool_size;
        }
        self.schedule()?;
        Ok(self)
    }

    /// Built-in seed mirroring the production deployment: weekly digest,
    /// Monday 01:00 UTC, 6 picks from the top 50, zh-TW descriptions.
    pub(crate) fn default_seed() -> Self {
        let mut language_icons = HashMap::new();
        for (k, v) in [
            ("Rust", "🦀"),
            ("Python", "🐍"),
            ("JavaScript", "🟨"),
            ("TypeScript", "🔷"),
            ("Go", "🐹"),
            ("C", "⚙️"),
            ("C++", "⚙️"),
            ("C#", "🎯"),
            ("Java", "☕"),
            ("Kotlin", "🤖"),
            ("Swift", "🕊️"),
            ("Ruby", "💎"),
            ("PHP", "🐘"),
            ("Shell", "🐚"),
            ("HTML", "🌐"),
            ("CSS", "🎨"),
            ("Zig", "⚡"),
            ("Jupyter Notebook", "📓"),
        ] {
            language_icons.insert(k.to_string(), v.to_string());
        }

        let priority_tags = [
            "ai",
            "llm",
            "machine-learning",
            "deep-learning",
            "agents",
            "docker",
            "kubernetes",
            "self-hosted",
            "security",
            "cli",
            "database",
            "automation",
            "rust",
            "python",
            "typescript",
            "react",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        Self {
            window: Window::Weekly,
            pool_size: 50,
            sample_size: 6,
            desc_limit: 86,
            target_locale: "zh-TW".to_string(),
            placeholder_desc: "The author was too lazy to write a description.".to_string(),
            unknown_language: "General".to_string(),
            default_icon: "🔧".to_string(),
            priority_tags,
            language_icons,
            schedule_weekday: Some("mon".to_string()),
            schedule_time: "01:00".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use std::{env, fs};

    #[test]
    fn default_seed_is_valid_and_weekly() {
        let cfg = DigestConfig::default_seed().validated().unwrap();
        assert_eq!(cfg.window, Window::Weekly);
        assert!(cfg.sample_size <= cfg.pool_size);
        let sched = cfg.schedule().unwrap();
        assert_eq!(sched.weekday, Some(Weekday::Mon));
        assert_eq!(sched.at, NaiveTime::from_hms_opt(1, 0, 0).unwrap());
    }

    #[test]
    fn partial_toml_overrides_seed() {
        let cfg: DigestConfig = toml::from_str(
            r#"
                window = "daily"
                sample_size = 3
                desc_limit = 90
            "#,
        )
        .unwrap();
        let cfg = cfg.validated().unwrap();
        assert_eq!(cfg.window, Window::Daily);
        assert_eq!(cfg.sample_size, 3);
        assert_eq!(cfg.desc_limit, 90);
        // Untouched fields keep their seeded values.
        assert_eq!(cfg.pool_size, 50);
        assert_eq!(cfg.target_locale, "zh-TW");
        // Daily window ignores the seeded weekday.
        assert_eq!(cfg.schedule().unwrap().weekday, None);
    }

    #[test]
    fn oversized_sample_is_clamped_to_pool() {
        let cfg: DigestConfig = toml::from_str("pool_size = 4\nsample_size = 10").unwrap();
        let cfg = cfg.validated().unwrap();
        assert_eq!(cfg.sample_size, 4);
    }

    #[test]
    fn tiny_desc_limit_is_rejected() {
        let cfg: DigestConfig = toml::from_str("desc_limit = 3").unwrap();
        assert!(cfg.validated().is_err());
    }

    #[test]
    fn bad_schedule_time_is_rejected() {
        let cfg: DigestConfig = toml::from_str(r#"schedule_time = "25:99""#).unwrap();
        assert!(cfg.validated().is_err());
    }

    #[serial_test::serial]
    #[test]
    fn load_default_uses_env_then_fallbacks() {
        // Isolate CWD in a temp dir so a real config/ in the repo can't interfere.
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_CONFIG_PATH);

        // No files in the temp CWD → seeded defaults.
        let cfg = DigestConfig::load_default().unwrap();
        assert_eq!(cfg.pool_size, 50);

        // Env path takes precedence.
        let p = tmp.path().join("digest.toml");
        fs::write(&p, "pool_size = 7\nsample_size = 2").unwrap();
        env::set_var(ENV_CONFIG_PATH, p.display().to_string());
        let cfg2 = DigestConfig::load_default().unwrap();
        assert_eq!(cfg2.pool_size, 7);
        assert_eq!(cfg2.sample_size, 2);
        env::remove_var(ENV_CONFIG_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
