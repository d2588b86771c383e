// src/scheduler.rs
//! Scheduled trigger: fires the pipeline at a fixed UTC time, optionally
//! pinned to a weekday, always with the configured default destination.

use chrono::{DateTime, Datelike, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::config::ScheduleSpec;
use crate::notify::ChatId;
use crate::pipeline::DigestPipeline;

/// Time until the next occurrence of the schedule, strictly after `now`.
/// Scanning 8 days always finds one: an unpinned schedule hits today or
/// tomorrow, a weekday-pinned one hits within the next 7 days.
pub fn duration_until_next(now: DateTime<Utc>, spec: &ScheduleSpec) -> ChronoDuration {
    for days_ahead in 0..=7 {
        let date = (now + ChronoDuration::days(days_ahead)).date_naive();
        if let Some(weekday) = spec.weekday {
            if date.weekday() != weekday {
                continue;
            }
        }
        let candidate = date.and_time(spec.at).and_utc();
        if candidate > now {
            return candidate - now;
        }
    }
    ChronoDuration::days(7)
}

/// Spawn the background schedule loop. Without a default destination each
/// firing is skipped with a warning (nothing to deliver to yet).
pub fn spawn_schedule_loop(
    pipeline: Arc<DigestPipeline>,
    spec: ScheduleSpec,
    default_destination: Option<ChatId>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let wait = duration_until_next(Utc::now(), &spec);
            let wait = wait.to_std().unwrap_or(Duration::from_secs(60));
            tracing::info!(
                seconds_until = wait.as_secs(),
                "scheduled digest armed"
            );
            tokio::time::sleep(wait).await;

            match default_destination {
                Some(dest) => {
                    let outcome = pipeline.run(dest).await;
                    tracing::info!(?outcome, "scheduled digest run finished");
                }
                None => {
                    tracing::warn!(
                        "no default destination configured, skipping scheduled digest"
                    );
                }
            }
        }
    })
}
