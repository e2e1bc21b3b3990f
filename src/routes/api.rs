//! JSON contract consumed by the marketing frontend and by `CmsClient`:
//! `GET /api/{page}/{section}` and `PUT|POST` of the same path.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::{AppError, AppResult};
use crate::sections::{schema, validate, SectionRecord};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/{page}/{section}",
        get(get_section).put(save_section).post(save_section),
    )
}

async fn get_section(
    State(state): State<AppState>,
    Path((page, section)): Path<(String, String)>,
) -> AppResult<Json<SectionRecord>> {
    // Unknown page/section pairs are 404, same as missing records
    schema::find(&page, &section).ok_or(AppError::NotFound)?;

    let record = state
        .repo
        .get(&page, &section)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(record))
}

/// Create-or-update: the record appears on first save.
async fn save_section(
    State(state): State<AppState>,
    Path((page, section)): Path<(String, String)>,
    Json(record): Json<SectionRecord>,
) -> AppResult<Json<SectionRecord>> {
    let schema = schema::find(&page, &section).ok_or(AppError::NotFound)?;
    validate(schema, &record).map_err(|e| AppError::Validation(e.to_string()))?;

    let persisted = state.repo.upsert(&page, &section, &record).await?;
    tracing::info!(section = %schema.key(), "Section saved");
    Ok(Json(persisted))
}
