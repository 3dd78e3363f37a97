use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

use crate::db;
use crate::models::ActionLog;

/// Outcome of looking for the same action on the same target inside the window.
#[derive(Debug, Clone)]
pub enum DuplicateCheck {
    Clear,
    Duplicate(ActionLog),
}

impl DuplicateCheck {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DuplicateCheck::Duplicate(_))
    }
}

/// Start of the window ending at `now`. Entries performed exactly at the cutoff still count.
pub fn cutoff(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    now - window
}

/// Evaluate the window as of `now`. Read-only and lock-free: two concurrent
/// checks may both come back clear.
pub async fn check(
    pool: &SqlitePool,
    target_id: i64,
    action_type: &str,
    window: Duration,
    now: DateTime<Utc>,
) -> Result<DuplicateCheck, sqlx::Error> {
    let latest =
        db::action_logs::find_latest_since(pool, target_id, action_type, cutoff(now, window))
            .await?;

    Ok(match latest {
        Some(log) => DuplicateCheck::Duplicate(log),
        None => DuplicateCheck::Clear,
    })
}
