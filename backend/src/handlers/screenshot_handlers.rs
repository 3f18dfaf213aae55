use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::handlers::dev_errors::DevServerError;
use crate::AppState;

#[derive(Deserialize)]
pub struct ScreenshotRequest {
    image: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ScreenshotResponse {
    pub path: String,
    pub filename: String,
}

/// The base64 part of a `data:image/...;base64,` URL, or the whole value when
/// it is bare base64. Line breaks and other whitespace inside the payload are
/// dropped, since wrapped base64 is common in copied data URLs.
pub fn base64_payload(image: &str) -> String {
    let encoded = match image.split_once(',') {
        Some((_, encoded)) => encoded,
        None => image,
    };
    encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

pub fn extension_for(image: &str) -> &'static str {
    if image.contains("image/jpeg") || image.contains("image/jpg") {
        "jpg"
    } else if image.contains("image/webp") {
        "webp"
    } else {
        "png"
    }
}

/// Replaces everything but ASCII letters, digits, `_` and `-` with `-`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

pub fn screenshot_filename(taken_at: DateTime<Local>, name: Option<&str>, extension: &str) -> String {
    let timestamp = taken_at.format("%Y-%m-%d_%H%M%S");
    match name.filter(|n| !n.is_empty()) {
        Some(name) => format!("{}_{}.{}", timestamp, sanitize_name(name), extension),
        None => format!("{}.{}", timestamp, extension),
    }
}

/// Saves a screenshot posted from the browser into the site's screenshots
/// directory.
pub async fn save_screenshot(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ScreenshotResponse>, DevServerError> {
    let screenshots_dir = &state.config.screenshots_dir;
    tokio::fs::create_dir_all(screenshots_dir)
        .await
        .map_err(|e| DevServerError::Screenshot(e.to_string()))?;

    let request: ScreenshotRequest =
        serde_json::from_slice(&body).map_err(|_| DevServerError::MissingImage)?;
    let image = request
        .image
        .filter(|image| !image.is_empty())
        .ok_or(DevServerError::MissingImage)?;

    let filename = screenshot_filename(Local::now(), request.name.as_deref(), extension_for(&image));
    let bytes = STANDARD
        .decode(base64_payload(&image))
        .map_err(|e| DevServerError::Screenshot(e.to_string()))?;

    let file_path = screenshots_dir.join(&filename);
    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| DevServerError::Screenshot(e.to_string()))?;

    tracing::info!("Saved screenshot {} ({} bytes)", file_path.display(), bytes.len());
    Ok(Json(ScreenshotResponse {
        path: file_path.display().to_string(),
        filename,
    }))
}
