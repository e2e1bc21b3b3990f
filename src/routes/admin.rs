//! Server-rendered admin forms: one generic editor page driven by the
//! section schema registry.

use askama::Template;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use crate::editor::{EditorStatus, SectionEditor, UploadFile};
use crate::error::{AppError, AppResult};
use crate::routes::local::LocalApi;
use crate::sections::schema::{self, SectionSchema};
use crate::sections::SectionRecord;
use crate::state::AppState;

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/admin/{page}/{section}", get(show_editor).post(submit))
        .route("/admin/{page}/{section}/image", post(upload))
        .route("/admin/{page}/{section}/slides/add", post(add_slide))
        .route(
            "/admin/{page}/{section}/slides/remove/{index}",
            post(remove_slide),
        )
}

struct IndexEntry {
    page: String,
    section: String,
    label: String,
    title: String,
    customized: bool,
}

#[derive(Template)]
#[template(path = "pages/index.html")]
struct IndexTemplate {
    entries: Vec<IndexEntry>,
}

#[derive(Template)]
#[template(path = "pages/editor.html")]
struct EditorTemplate {
    label: String,
    page: String,
    section: String,
    has_subtitle: bool,
    has_description: bool,
    has_content: bool,
    has_image: bool,
    has_slides: bool,
    requires_image: bool,
    can_remove_slides: bool,
    title: String,
    subtitle: String,
    description: String,
    content: String,
    image_url: String,
    slides: Vec<String>,
    slides_joined: String,
    is_active: bool,
    fallback: bool,
    error: String,
    success: String,
}

impl EditorTemplate {
    fn build(
        schema: &SectionSchema,
        record: &SectionRecord,
        status: EditorStatus,
        error: Option<&str>,
        success: Option<&str>,
    ) -> Self {
        Self {
            label: schema.label.to_string(),
            page: schema.page.to_string(),
            section: schema.section.to_string(),
            has_subtitle: schema.has_subtitle,
            has_description: schema.has_description,
            has_content: schema.has_content,
            has_image: schema.has_image,
            has_slides: schema.has_slides,
            requires_image: schema.requires_image,
            can_remove_slides: record.slides.len() > schema.min_slides,
            title: record.title.clone(),
            subtitle: record.subtitle.clone().unwrap_or_default(),
            description: record.description.clone().unwrap_or_default(),
            content: record.content.clone().unwrap_or_default(),
            image_url: record.image_url.clone().unwrap_or_default(),
            slides: record.slides.clone(),
            slides_joined: record.slides.join("\n"),
            is_active: record.is_active,
            fallback: status == EditorStatus::ReadyWithFallback,
            error: error.unwrap_or_default().to_string(),
            success: success.unwrap_or_default().to_string(),
        }
    }

    fn from_editor(editor: &SectionEditor<LocalApi>) -> Self {
        Self::build(
            editor.schema(),
            editor.record(),
            editor.status(),
            editor.error(),
            editor.success_message(),
        )
    }
}

fn find_schema(page: &str, section: &str) -> AppResult<&'static SectionSchema> {
    schema::find(page, section).ok_or(AppError::NotFound)
}

async fn loaded_editor(
    state: &AppState,
    page: &str,
    section: &str,
) -> AppResult<SectionEditor<LocalApi>> {
    let schema = find_schema(page, section)?;
    let mut editor = SectionEditor::new(schema, LocalApi::new(state));
    editor.load().await;
    Ok(editor)
}

/// Admin index: every editable section, flagged when it still shows
/// fallback content.
async fn index(State(state): State<AppState>) -> AppResult<Response> {
    let stored = state.repo.list().await.unwrap_or_else(|e| {
        tracing::warn!("Section list unavailable: {}", e);
        Vec::new()
    });

    let entries = schema::registry()
        .iter()
        .map(|schema| {
            let row = stored
                .iter()
                .find(|s| s.page == schema.page && s.section == schema.section);
            IndexEntry {
                page: schema.page.to_string(),
                section: schema.section.to_string(),
                label: schema.label.to_string(),
                title: row
                    .map(|r| r.title.clone())
                    .unwrap_or_else(|| schema.fallback.title.to_string()),
                customized: row.is_some(),
            }
        })
        .collect();

    Ok(Html(IndexTemplate { entries }).into_response())
}

async fn show_editor(
    State(state): State<AppState>,
    Path((page, section)): Path<(String, String)>,
) -> AppResult<Response> {
    let editor = loaded_editor(&state, &page, &section).await?;
    Ok(Html(EditorTemplate::from_editor(&editor)).into_response())
}

#[derive(Deserialize)]
struct SectionForm {
    title: String,
    subtitle: Option<String>,
    description: Option<String>,
    content: Option<String>,
    image_url: Option<String>,
    slides: Option<String>,
    is_active: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    })
}

impl SectionForm {
    fn into_record(self) -> SectionRecord {
        let slides = self
            .slides
            .as_deref()
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        SectionRecord {
            id: None,
            title: self.title.trim().to_string(),
            subtitle: non_empty(self.subtitle),
            description: non_empty(self.description),
            content: non_empty(self.content),
            image_url: non_empty(self.image_url),
            slides,
            is_active: self.is_active.is_some(),
        }
    }
}

async fn submit(
    State(state): State<AppState>,
    Path((page, section)): Path<(String, String)>,
    Form(form): Form<SectionForm>,
) -> AppResult<Response> {
    let mut editor = loaded_editor(&state, &page, &section).await?;
    let values = form.into_record();

    match editor.submit(values.clone()).await {
        Ok(()) => Ok(Html(EditorTemplate::from_editor(&editor)).into_response()),
        Err(_) => {
            // Keep the form open with the submitted values
            let template = EditorTemplate::build(
                editor.schema(),
                &values,
                editor.status(),
                editor.error(),
                None,
            );
            Ok(Html(template).into_response())
        }
    }
}

async fn add_slide(
    State(state): State<AppState>,
    Path((page, section)): Path<(String, String)>,
) -> AppResult<Response> {
    let mut editor = loaded_editor(&state, &page, &section).await?;
    editor.add_slide();
    Ok(Html(EditorTemplate::from_editor(&editor)).into_response())
}

async fn remove_slide(
    State(state): State<AppState>,
    Path((page, section, index)): Path<(String, String, usize)>,
) -> AppResult<Response> {
    let mut editor = loaded_editor(&state, &page, &section).await?;

    let error = editor.remove_slide(index).err().map(|e| e.to_string());
    let template = EditorTemplate::build(
        editor.schema(),
        editor.record(),
        editor.status(),
        error.as_deref(),
        None,
    );
    Ok(Html(template).into_response())
}

/// Multipart image upload from the form: optional `slide` index field plus
/// the `image` file. Rewrites the in-form URL; saving persists it.
async fn upload(
    State(state): State<AppState>,
    Path((page, section)): Path<(String, String)>,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let mut editor = loaded_editor(&state, &page, &section).await?;

    let mut slide_index: Option<usize> = None;
    let mut file: Option<UploadFile> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("slide") => {
                let text = field.text().await?;
                if !text.trim().is_empty() {
                    slide_index = Some(text.trim().parse().map_err(|_| {
                        AppError::BadRequest("Invalid slide index".to_string())
                    })?);
                }
            }
            Some("image") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let bytes = field.bytes().await?.to_vec();
                file = Some(UploadFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest("Missing 'image' field".to_string()))?;

    // Rejections render back into the form banner
    let _ = editor.upload_image(file, slide_index).await;
    Ok(Html(EditorTemplate::from_editor(&editor)).into_response())
}
