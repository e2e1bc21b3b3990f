//! Repository-backed [`SectionApi`] used by the server-rendered admin
//! forms. Same seam the remote `CmsClient` implements, so the editor
//! behaves identically in both modes — including fallback content when
//! the database cannot be reached.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use crate::editor::{ApiError, SectionApi, UploadFile};
use crate::routes::upload::store_image;
use crate::sections::repository::{RepositoryError, SectionRepository};
use crate::sections::SectionRecord;
use crate::state::AppState;

pub struct LocalApi {
    repo: Arc<dyn SectionRepository>,
    uploads_dir: PathBuf,
}

impl LocalApi {
    pub fn new(state: &AppState) -> Self {
        Self {
            repo: state.repo.clone(),
            uploads_dir: state.config.uploads_path().clone(),
        }
    }
}

// Locally the "backend" is the database; failing to reach it is the
// unavailable case.
fn repo_err(e: RepositoryError) -> ApiError {
    ApiError::Unavailable(e.to_string())
}

#[async_trait]
impl SectionApi for LocalApi {
    async fn get_section(
        &self,
        page: &str,
        section: &str,
    ) -> Result<Option<SectionRecord>, ApiError> {
        self.repo.get(page, section).await.map_err(repo_err)
    }

    async fn save_section(
        &self,
        page: &str,
        section: &str,
        record: &SectionRecord,
    ) -> Result<SectionRecord, ApiError> {
        self.repo.upsert(page, section, record).await.map_err(repo_err)
    }

    async fn upload_image(&self, file: UploadFile) -> Result<String, ApiError> {
        store_image(&self.uploads_dir, &file.file_name, &file.bytes)
            .await
            .map_err(|e| ApiError::Unavailable(format!("Failed to store upload: {}", e)))
    }

    /// Empty base: server-rendered pages keep asset URLs root-relative.
    fn base_url(&self) -> &str {
        ""
    }
}
