use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::storage::ImageStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub images: ImageStore,
}
