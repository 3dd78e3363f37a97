pub mod actions;
pub mod history;

use axum::Router;
use axum::routing::{get, post};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/check-duplication", post(actions::check_duplication))
        .route("/actions", post(actions::log_action))
        .route("/history", get(history::list))
}
