use axum::http::HeaderMap;
use bytes::Bytes;
use serde_json::{Map, Value};

/// A file part pulled out of a multipart body.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: Map<String, Value>,
    pub file: Option<FileUpload>,
}

/// Parse a non-multipart request body based on Content-Type header.
/// An empty body yields an empty object.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<Map<String, Value>, String> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Map::new());
    }

    let value = match content_type {
        Some(ct) if ct.contains("application/json") => {
            serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))?
        }
        Some(ct) if ct.contains("application/x-www-form-urlencoded") => {
            Value::Object(parse_form_urlencoded(body))
        }
        // Missing or unknown type: try JSON first, then form-urlencoded
        _ => serde_json::from_slice(body)
            .unwrap_or_else(|_| Value::Object(parse_form_urlencoded(body))),
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err("Request body must be an object".to_string()),
    }
}

/// Decode `a=1&b=2` pairs. Later duplicates overwrite earlier ones.
pub fn parse_form_urlencoded(body: &[u8]) -> Map<String, Value> {
    form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect()
}

/// Parse multipart form data using multer. Text parts become fields; the part
/// named `file_field` is kept as raw bytes.
pub async fn parse_multipart(
    headers: &HeaderMap,
    body: Bytes,
    file_field: &str,
) -> Result<MultipartForm, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = MultipartForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let name = field.name().unwrap_or("unknown").to_string();
        if name == file_field {
            let file_name = field.file_name().map(|s| s.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| format!("File read error: {e}"))?;
            form.file = Some(FileUpload { file_name, data });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| format!("Field read error: {e}"))?;
            form.fields.insert(name, Value::String(value));
        }
    }

    Ok(form)
}
