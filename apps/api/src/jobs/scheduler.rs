//! Recurring job scheduler — a minute-resolution tokio loop over the
//! automation pipelines.
//!
//! Each firing takes a redis `SET NX EX` lock keyed by job name and fire
//! minute, so multiple API instances can run the scheduler concurrently
//! without double-running a job. Job bodies own their error handling; the
//! loop itself never propagates.
//!
//! Schedule (local time):
//! - keyword discovery: daily 09:00
//! - content generation: daily 10:00
//! - backlink sync: every 3rd day 14:00
//! - weekly reports: Monday 08:00

use chrono::{DateTime, Datelike, Local, Timelike, Weekday};
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::pipeline::{backlinks, content, discovery, reports};
use crate::state::AppState;

/// Lock TTL comfortably above the longest expected job run.
const LOCK_TTL_SECS: u64 = 5400;

/// One scheduled job: a name (also the lock key prefix) and its due
/// predicate over the current local minute.
pub struct JobSpec {
    pub name: &'static str,
    pub due: fn(&DateTime<Local>) -> bool,
}

pub fn jobs() -> Vec<JobSpec> {
    vec![
        JobSpec { name: "keyword-discovery", due: discovery_due },
        JobSpec { name: "content-generation", due: content_due },
        JobSpec { name: "backlink-sync", due: backlink_sync_due },
        JobSpec { name: "weekly-reports", due: weekly_reports_due },
    ]
}

pub fn discovery_due(now: &DateTime<Local>) -> bool {
    now.hour() == 9 && now.minute() == 0
}

pub fn content_due(now: &DateTime<Local>) -> bool {
    now.hour() == 10 && now.minute() == 0
}

/// Every third day of the year, so the cadence survives restarts without
/// persisted scheduler state.
pub fn backlink_sync_due(now: &DateTime<Local>) -> bool {
    now.ordinal() % 3 == 0 && now.hour() == 14 && now.minute() == 0
}

pub fn weekly_reports_due(now: &DateTime<Local>) -> bool {
    now.weekday() == Weekday::Mon && now.hour() == 8 && now.minute() == 0
}

/// Spawns the scheduler loop.
pub fn spawn(state: AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run(state))
}

async fn run(state: AppState) {
    info!("Job scheduler started ({} jobs)", jobs().len());
    loop {
        // Wake at the top of each minute.
        let wait = 60 - Local::now().second().min(59) as u64;
        sleep(Duration::from_secs(wait.max(1))).await;

        let now = Local::now();
        for job in jobs() {
            if !(job.due)(&now) {
                continue;
            }
            match try_acquire_lock(&state.redis, job.name, &now).await {
                Ok(true) => {
                    info!("Running job {}", job.name);
                    dispatch(job.name, &state).await;
                }
                Ok(false) => {
                    debug!("Job {} already claimed by another instance", job.name);
                }
                Err(e) => {
                    warn!("Job lock for {} failed ({e}), skipping this firing", job.name);
                }
            }
        }
    }
}

async fn dispatch(name: &str, state: &AppState) {
    match name {
        "keyword-discovery" => discovery::run_daily_discovery(state).await,
        "content-generation" => content::run_daily_content(state).await,
        "backlink-sync" => backlinks::run_backlink_sync(state).await,
        "weekly-reports" => reports::run_weekly_reports(state).await,
        other => warn!("Unknown job {other:?}"),
    }
}

/// Per-firing lock key, e.g. `jobs:lock:weekly-reports:2026-08-10-0800`.
pub fn lock_key(name: &str, now: &DateTime<Local>) -> String {
    format!("jobs:lock:{name}:{}", now.format("%Y-%m-%d-%H%M"))
}

async fn try_acquire_lock(
    redis: &redis::Client,
    name: &str,
    now: &DateTime<Local>,
) -> Result<bool, redis::RedisError> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    let acquired: Option<String> = redis::cmd("SET")
        .arg(lock_key(name, now))
        .arg("1")
        .arg("NX")
        .arg("EX")
        .arg(LOCK_TTL_SECS)
        .query_async(&mut conn)
        .await?;
    Ok(acquired.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_discovery_fires_at_nine_sharp() {
        assert!(discovery_due(&local(2026, 8, 11, 9, 0)));
        assert!(!discovery_due(&local(2026, 8, 11, 9, 1)));
        assert!(!discovery_due(&local(2026, 8, 11, 10, 0)));
    }

    #[test]
    fn test_content_fires_at_ten() {
        assert!(content_due(&local(2026, 8, 11, 10, 0)));
        assert!(!content_due(&local(2026, 8, 11, 9, 0)));
    }

    #[test]
    fn test_backlink_sync_every_third_day() {
        // 2026-01-03 is ordinal 3; 2026-01-04 is ordinal 4
        assert!(backlink_sync_due(&local(2026, 1, 3, 14, 0)));
        assert!(!backlink_sync_due(&local(2026, 1, 4, 14, 0)));
        assert!(!backlink_sync_due(&local(2026, 1, 3, 14, 1)));
    }

    #[test]
    fn test_weekly_reports_monday_morning_only() {
        // 2026-08-10 is a Monday
        assert!(weekly_reports_due(&local(2026, 8, 10, 8, 0)));
        assert!(!weekly_reports_due(&local(2026, 8, 11, 8, 0)));
        assert!(!weekly_reports_due(&local(2026, 8, 10, 9, 0)));
    }

    #[test]
    fn test_lock_key_is_minute_scoped() {
        let a = lock_key("weekly-reports", &local(2026, 8, 10, 8, 0));
        assert_eq!(a, "jobs:lock:weekly-reports:2026-08-10-0800");
        let b = lock_key("weekly-reports", &local(2026, 8, 10, 8, 1));
        assert_ne!(a, b);
    }

    #[test]
    fn test_job_names_are_unique() {
        let specs = jobs();
        let mut names: Vec<&str> = specs.iter().map(|j| j.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), specs.len());
    }
}
