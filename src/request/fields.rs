use serde_json::{Map, Value};

use crate::error::AppError;

/// Named request fields gathered from the query string and the body.
#[derive(Debug, Default)]
pub struct Fields(Map<String, Value>);

impl Fields {
    /// Query string values take precedence over body values of the same name.
    pub fn merge(query: Map<String, Value>, body: Map<String, Value>) -> Self {
        let mut map = body;
        map.extend(query);
        Self(map)
    }

    pub fn required_str(&self, name: &str) -> Result<String, AppError> {
        match self.0.get(name) {
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::String(_)) | Some(Value::Null) | None => {
                Err(AppError::BadRequest(format!("Missing required field: {name}")))
            }
            Some(_) => Err(AppError::BadRequest(format!("Field {name} must be a string"))),
        }
    }

    pub fn required_i64(&self, name: &str) -> Result<i64, AppError> {
        match self.0.get(name) {
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| AppError::BadRequest(format!("Field {name} must be an integer"))),
            Some(Value::String(s)) if !s.trim().is_empty() => s
                .trim()
                .parse()
                .map_err(|_| AppError::BadRequest(format!("Field {name} must be an integer"))),
            Some(Value::String(_)) | Some(Value::Null) | None => {
                Err(AppError::BadRequest(format!("Missing required field: {name}")))
            }
            Some(_) => Err(AppError::BadRequest(format!("Field {name} must be an integer"))),
        }
    }
}
