//! Image upload endpoint and on-disk serving of stored assets.

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::path::Path as FsPath;

use crate::error::{AppError, AppResult};
use crate::sections::{check_upload, MAX_UPLOAD_BYTES};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/upload/image", post(upload_image))
        .route("/uploads/{*path}", get(serve_upload))
        // Leave headroom above the 10MB cap for multipart framing
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024))
}

/// Write the image to the uploads directory under a fresh uuid name,
/// returning the root-relative URL it will be served from.
pub(crate) async fn store_image(
    uploads_dir: &FsPath,
    original_name: &str,
    bytes: &[u8],
) -> std::io::Result<String> {
    let ext = FsPath::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin")
        .to_ascii_lowercase();
    let stored_name = format!("{}.{}", uuid::Uuid::now_v7(), ext);

    tokio::fs::create_dir_all(uploads_dir).await?;
    tokio::fs::write(uploads_dir.join(&stored_name), bytes).await?;

    Ok(format!("/uploads/{}", stored_name))
}

/// `POST /api/upload/image` with multipart field `image` →
/// `{ "success": true, "imageUrl": "/uploads/..." }`.
async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<serde_json::Value>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or("").to_string();
        let bytes = field.bytes().await?;

        check_upload(&content_type, bytes.len())
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let url = store_image(state.config.uploads_path(), &file_name, &bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;

        tracing::info!(%file_name, %url, size = bytes.len(), "Image stored");
        return Ok(Json(json!({ "success": true, "imageUrl": url })));
    }

    Err(AppError::BadRequest("Missing 'image' field".to_string()))
}

/// Only plain relative segments may reach the filesystem: absolute paths,
/// `..`, `.` and prefix components would all escape the uploads directory
/// once joined.
fn is_safe_upload_path(path: &str) -> bool {
    use std::path::Component;

    !path.is_empty()
        && !path.contains('\\')
        && FsPath::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

async fn serve_upload(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> AppResult<Response> {
    if !is_safe_upload_path(&path) {
        return Err(AppError::BadRequest("Invalid path".to_string()));
    }

    let full_path = state.config.uploads_path().join(&path);
    let data = tokio::fs::read(&full_path)
        .await
        .map_err(|_| AppError::NotFound)?;

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime.as_ref().to_string()),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        data,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_image_writes_under_a_uuid_name() {
        let tmp = tempfile::tempdir().unwrap();
        let url = store_image(tmp.path(), "banner.PNG", b"fake image data")
            .await
            .unwrap();

        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".png"), "extension lowercased: {}", url);

        let stored = tmp.path().join(url.trim_start_matches("/uploads/"));
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"fake image data");
    }

    #[tokio::test]
    async fn store_image_defaults_missing_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let url = store_image(tmp.path(), "blob", b"data").await.unwrap();
        assert!(url.ends_with(".bin"));
    }

    #[test]
    fn plain_relative_paths_are_safe() {
        assert!(is_safe_upload_path("banner.png"));
        assert!(is_safe_upload_path("2024/banner.png"));
    }

    #[test]
    fn escaping_paths_are_rejected() {
        // Absolute paths would make join() discard the uploads base
        assert!(!is_safe_upload_path("/etc/passwd"));
        assert!(!is_safe_upload_path("/tmp/secret.txt"));
        assert!(!is_safe_upload_path("../config.toml"));
        assert!(!is_safe_upload_path("a/../../b.png"));
        assert!(!is_safe_upload_path("./a.png"));
        assert!(!is_safe_upload_path("a\\..\\b.png"));
        assert!(!is_safe_upload_path(""));
    }
}
