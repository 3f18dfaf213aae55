use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
};

use crate::handlers::dev_errors::DevServerError;
use crate::utils::site_paths::resolve_within;
use crate::utils::ssi::process_ssi;
use crate::AppState;

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Response, DevServerError> {
    let root = state.config.site_root.clone();
    let index = root.join("index.html");
    serve_with_ssi(root, index).await
}

/// HTML pages go through SSI, directories serve their `index.html`, and
/// everything else is sent as is.
pub async fn serve_file(
    State(state): State<Arc<AppState>>,
    Path(filepath): Path<String>,
) -> Result<Response, DevServerError> {
    let root = state.config.site_root.clone();
    let file_path = resolve_within(&root, &filepath).ok_or_else(|| {
        tracing::warn!("Refusing path outside site root: {}", filepath);
        DevServerError::Forbidden
    })?;

    if filepath.ends_with(".html") && file_path.exists() {
        return serve_with_ssi(root, file_path).await;
    }

    if file_path.is_dir() {
        let index = file_path.join("index.html");
        if index.exists() {
            return serve_with_ssi(root, index).await;
        }
        return Err(DevServerError::NotFound);
    }

    if file_path.exists() {
        let bytes = tokio::fs::read(&file_path)
            .await
            .map_err(|e| DevServerError::Internal(e.to_string()))?;
        let mime = mime_guess::from_path(&file_path).first_or_octet_stream();
        return Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response());
    }

    Err(DevServerError::NotFound)
}

async fn serve_with_ssi(root: PathBuf, file_path: PathBuf) -> Result<Response, DevServerError> {
    let processed = tokio::task::spawn_blocking(move || {
        std::fs::read_to_string(&file_path).map(|content| process_ssi(&content, &root))
    })
    .await
    .map_err(|e| DevServerError::Internal(e.to_string()))?;

    match processed {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DevServerError::FileNotFound),
        Err(e) => {
            tracing::error!("Failed to read page: {}", e);
            Err(DevServerError::Internal(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::dev_config::DevConfig;
    use axum::{body::Body, http::{Request, StatusCode}};
    use http_body_util::BodyExt;
    use std::fs;
    use tower::ServiceExt;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("partials")).unwrap();
        fs::create_dir_all(root.join("guides")).unwrap();
        fs::create_dir_all(root.join("img")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("partials/header.html"), "<header>Jammix</header>").unwrap();
        fs::write(
            root.join("index.html"),
            "<!--#include virtual=\"/partials/header.html\" --><h1>Home</h1>",
        )
        .unwrap();
        fs::write(
            root.join("guides/index.html"),
            "<!--#include virtual=\"/partials/header.html\" --><h1>Guides</h1>",
        )
        .unwrap();
        fs::write(root.join("img/logo.svg"), "<svg></svg>").unwrap();
        fs::write(root.join("app.js"), "console.log('hi')").unwrap();
        dir
    }

    async fn get(dir: &tempfile::TempDir, uri: &str) -> (StatusCode, Option<String>, String) {
        let state = Arc::new(AppState {
            config: DevConfig::new(0, dir.path()).unwrap(),
        });
        let response = crate::app(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn root_serves_index_with_includes() {
        let dir = site();
        let (status, content_type, body) = get(&dir, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert_eq!(body, "<header>Jammix</header><h1>Home</h1>");
    }

    #[tokio::test]
    async fn html_files_are_processed() {
        let dir = site();
        let (status, _, body) = get(&dir, "/guides/index.html").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<header>Jammix</header><h1>Guides</h1>");
    }

    #[tokio::test]
    async fn directories_serve_their_index() {
        let dir = site();
        let (status, _, body) = get(&dir, "/guides").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.ends_with("<h1>Guides</h1>"));
    }

    #[tokio::test]
    async fn directory_without_index_is_not_found() {
        let dir = site();
        let (status, _, body) = get(&dir, "/empty").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not found");
    }

    #[tokio::test]
    async fn static_files_get_a_guessed_content_type() {
        let dir = site();
        let (status, content_type, body) = get(&dir, "/img/logo.svg").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("image/svg+xml"));
        assert_eq!(body, "<svg></svg>");

        let (_, content_type, _) = get(&dir, "/app.js").await;
        assert!(content_type.unwrap().contains("javascript"));
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let dir = site();
        let (status, _, body) = get(&dir, "/nope.png").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not found");
    }

    #[tokio::test]
    async fn missing_index_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _, body) = get(&dir, "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "File not found");
    }

    #[tokio::test]
    async fn traversal_is_forbidden() {
        let dir = site();
        let (status, _, body) = get(&dir, "/..%2F..%2Fetc%2Fpasswd").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "Forbidden");
    }
}
