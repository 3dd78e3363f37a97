use axum::Json;
use axum::extract::State;

use crate::db;
use crate::error::AppError;
use crate::models::ActionLog;
use crate::state::SharedState;

/// Every log, newest first. Unbounded.
pub async fn list(State(state): State<SharedState>) -> Result<Json<Vec<ActionLog>>, AppError> {
    let logs = db::action_logs::list_all(&state.pool).await?;
    Ok(Json(logs))
}
