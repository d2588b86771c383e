// src/format.rs
//! Deterministic Markdown rendering of one digest. No I/O, no clock: the
//! generation timestamp is part of the input.

use chrono::{DateTime, Utc};

use crate::config::Window;
use crate::enrich::DigestEntry;

const ATTRIBUTION: &str = "🔗 _Powered by GitHub Trending_";

/// One run's output. Entry order is sampling order; never re-sorted.
#[derive(Debug, Clone)]
pub struct Digest {
    pub window: Window,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<DigestEntry>,
}

/// Render the full message body: header, one block per entry, attribution
/// footer. Callers skip rendering (and delivery) for empty digests.
pub fn render_digest(digest: &Digest) -> String {
    let date = digest.generated_at.format("%Y-%m-%d");
    let mut msg = format!(
        "📅 **{date} Open Source {} Digest** 🚀\n",
        digest.window.label()
    );
    msg.push_str(&format!(
        "🔥 Top {} fresh picks {}\n\n",
        digest.entries.len(),
        digest.window.period_phrase()
    ));

    for entry in &digest.entries {
        msg.push_str(&format!(
            "{}. 📦 **[{}]({})**\n   {} | {}\n   📝 {}\n\n",
            entry.rank, entry.name, entry.link, entry.stats, entry.tags, entry.description
        ));
    }

    msg.push_str(ATTRIBUTION);
    msg
}
