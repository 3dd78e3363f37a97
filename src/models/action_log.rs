use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ActionLog {
    pub id: i64,
    pub target_id: i64,
    pub user_name: String,
    pub action_type: String,
    pub performed_at: DateTime<Utc>,
    pub image_url: String,
    pub image_key: String,
    pub original_filename: Option<String>,
}

/// Fields needed to insert a log row. `performed_at` is set by the caller.
#[derive(Debug, Clone)]
pub struct NewActionLog {
    pub target_id: i64,
    pub user_name: String,
    pub action_type: String,
    pub image_url: String,
    pub image_key: String,
    pub original_filename: Option<String>,
}
