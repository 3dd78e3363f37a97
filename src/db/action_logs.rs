use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{ActionLog, NewActionLog};

pub async fn create(
    pool: &SqlitePool,
    log: &NewActionLog,
    performed_at: DateTime<Utc>,
) -> Result<ActionLog, sqlx::Error> {
    sqlx::query_as::<_, ActionLog>(
        "INSERT INTO action_logs
            (target_id, user_name, action_type, performed_at, image_url, image_key, original_filename)
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(log.target_id)
    .bind(&log.user_name)
    .bind(&log.action_type)
    .bind(performed_at)
    .bind(&log.image_url)
    .bind(&log.image_key)
    .bind(&log.original_filename)
    .fetch_one(pool)
    .await
}

/// Most recent log for the pair performed at or after `cutoff`.
pub async fn find_latest_since(
    pool: &SqlitePool,
    target_id: i64,
    action_type: &str,
    cutoff: DateTime<Utc>,
) -> Result<Option<ActionLog>, sqlx::Error> {
    sqlx::query_as::<_, ActionLog>(
        "SELECT * FROM action_logs
         WHERE target_id = ? AND action_type = ? AND performed_at >= ?
         ORDER BY performed_at DESC, id DESC LIMIT 1",
    )
    .bind(target_id)
    .bind(action_type)
    .bind(cutoff)
    .fetch_optional(pool)
    .await
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<ActionLog>, sqlx::Error> {
    sqlx::query_as::<_, ActionLog>(
        "SELECT * FROM action_logs ORDER BY performed_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}
