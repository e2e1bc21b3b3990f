//! Remote-backend implementation of [`SectionApi`] over the CMS HTTP
//! contract: JSON section CRUD plus the multipart image upload endpoint.

use async_trait::async_trait;
use serde::Deserialize;

use crate::editor::{ApiError, SectionApi, UploadFile};
use crate::sections::SectionRecord;

pub struct CmsClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    success: bool,
    #[serde(default)]
    image_url: String,
}

impl CmsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn section_url(&self, page: &str, section: &str) -> String {
        format!("{}/api/{}/{}", self.base_url, page, section)
    }

    /// Connection-level failures mean the backend cannot be reached at
    /// all; the editor degrades to fallback content for those.
    fn classify(e: reqwest::Error) -> ApiError {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Unavailable(e.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SectionApi for CmsClient {
    async fn get_section(
        &self,
        page: &str,
        section: &str,
    ) -> Result<Option<SectionRecord>, ApiError> {
        let response = self
            .http
            .get(self.section_url(page, section))
            .send()
            .await
            .map_err(Self::classify)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check_status(response).await?;
        let record = response
            .json::<SectionRecord>()
            .await
            .map_err(Self::classify)?;
        Ok(Some(record))
    }

    async fn save_section(
        &self,
        page: &str,
        section: &str,
        record: &SectionRecord,
    ) -> Result<SectionRecord, ApiError> {
        let response = self
            .http
            .put(self.section_url(page, section))
            .json(record)
            .send()
            .await
            .map_err(Self::classify)?;

        let response = Self::check_status(response).await?;
        response
            .json::<SectionRecord>()
            .await
            .map_err(Self::classify)
    }

    async fn upload_image(&self, file: UploadFile) -> Result<String, ApiError> {
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .http
            .post(format!("{}/api/upload/image", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status().as_u16();
        let response = Self::check_status(response).await?;
        let body = response
            .json::<UploadResponse>()
            .await
            .map_err(Self::classify)?;

        if !body.success {
            return Err(ApiError::Http {
                status,
                message: "Upload rejected by the backend".to_string(),
            });
        }
        Ok(body.image_url)
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
