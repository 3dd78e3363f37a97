use std::net::SocketAddr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{ConnectInfo, RawQuery, State};
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::db;
use crate::duplicate::{self, DuplicateCheck};
use crate::error::AppError;
use crate::models::{ActionLog, NewActionLog};
use crate::public_url;
use crate::request::{Fields, parser};
use crate::state::SharedState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Ok,
    Duplicate,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub status: CheckStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_performed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_performed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct LoggedResponse {
    pub status: &'static str,
    pub data: ActionLog,
}

pub async fn check_duplication(
    State(state): State<SharedState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CheckResponse>, AppError> {
    let content_type = headers.get("content-type").and_then(|v| v.to_str().ok());
    let body = parser::parse_body(content_type, &body).map_err(AppError::BadRequest)?;
    let fields = Fields::merge(query_fields(query.as_deref()), body);

    let target_id = fields.required_i64("target_id")?;
    let action_type = fields.required_str("action_type")?;

    let outcome = duplicate::check(
        &state.pool,
        target_id,
        &action_type,
        state.config.duplicate_window,
        Utc::now(),
    )
    .await?;

    let response = match outcome {
        DuplicateCheck::Duplicate(log) => {
            tracing::info!(target_id, action_type = %action_type, by = %log.user_name, "Duplicate action detected");
            CheckResponse {
                status: CheckStatus::Duplicate,
                message: format!(
                    "{} already did {} for this target at {}",
                    log.user_name,
                    action_type,
                    log.performed_at.format("%H:%M"),
                ),
                last_performed_by: Some(log.user_name),
                last_performed_at: Some(log.performed_at),
            }
        }
        DuplicateCheck::Clear => CheckResponse {
            status: CheckStatus::Ok,
            message: format!("No recent {action_type} for this target, go ahead"),
            last_performed_by: None,
            last_performed_at: None,
        },
    };

    Ok(Json(response))
}

pub async fn log_action(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<LoggedResponse>, AppError> {
    let is_multipart = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("multipart/form-data"));
    if !is_multipart {
        return Err(AppError::BadRequest(
            "Expected multipart/form-data with a file part".to_string(),
        ));
    }

    let form = parser::parse_multipart(&headers, body, "file")
        .await
        .map_err(AppError::BadRequest)?;
    let fields = Fields::merge(query_fields(query.as_deref()), form.fields);

    let target_id = fields.required_i64("target_id")?;
    let user_name = fields.required_str("user_name")?;
    let action_type = fields.required_str("action_type")?;

    let file = form
        .file
        .ok_or_else(|| AppError::BadRequest("Missing required field: file".to_string()))?;

    let image_key = state.images.save(file.file_name.as_deref(), &file.data).await?;
    let image_url = public_url::image_url(
        state.config.public_base_url.as_deref(),
        &headers,
        addr.ip(),
        &state.config.trusted_proxies,
        &image_key,
    );

    let new_log = NewActionLog {
        target_id,
        user_name,
        action_type,
        image_url,
        image_key,
        original_filename: file.file_name,
    };

    // A failed insert leaves the stored image behind; its key is content-derived
    // so it cannot shadow another upload.
    let log = db::action_logs::create(&state.pool, &new_log, Utc::now()).await?;

    tracing::info!(
        id = log.id,
        target_id = log.target_id,
        action_type = %log.action_type,
        user_name = %log.user_name,
        "Action recorded"
    );

    Ok(Json(LoggedResponse {
        status: "SUCCESS",
        data: log,
    }))
}

fn query_fields(query: Option<&str>) -> Map<String, Value> {
    query
        .map(|q| parser::parse_form_urlencoded(q.as_bytes()))
        .unwrap_or_default()
}
