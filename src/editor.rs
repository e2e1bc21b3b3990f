//! The generic section editor.
//!
//! One state machine drives every admin form: load the current record (or
//! fall back to the schema's placeholder content so the form always
//! renders), validate and save edits, route image uploads through the
//! upload endpoint, and manage slide lists. Per-section behavior lives in
//! [`SectionSchema`] flags, not in editor subclasses.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::sections::schema::SectionSchema;
use crate::sections::{check_upload, normalize_asset_url, validate, SectionRecord, ValidationError};

/// Backend seam the editor talks through. Implemented by the HTTP
/// [`CmsClient`](crate::client::CmsClient) and by the server's local
/// repository-backed adapter.
#[async_trait]
pub trait SectionApi: Send + Sync {
    /// Fetch the current record. `Ok(None)` means no record exists yet.
    async fn get_section(
        &self,
        page: &str,
        section: &str,
    ) -> Result<Option<SectionRecord>, ApiError>;

    /// Persist the record; returns it as the backend stored it.
    async fn save_section(
        &self,
        page: &str,
        section: &str,
        record: &SectionRecord,
    ) -> Result<SectionRecord, ApiError>;

    /// Store an image asset, returning its URL (possibly root-relative).
    async fn upload_image(&self, file: UploadFile) -> Result<String, ApiError>;

    /// Base URL used to normalize root-relative asset URLs.
    fn base_url(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend could not be reached at all. The editor suppresses the
    /// error banner for reads and degrades to fallback content instead.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("No slide at index {0}")]
    SlideOutOfRange(usize),

    #[error("At least {0} slide(s) must remain")]
    MinSlides(usize),
}

/// An image picked in the form, before it is posted anywhere.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorStatus {
    Loading,
    Ready,
    /// Rendering the schema's hardcoded placeholder because the backend
    /// read failed or no record exists yet.
    ReadyWithFallback,
    Saving,
}

#[derive(Debug, Clone)]
struct SuccessNotice {
    message: String,
    /// `None` clears on the next tick; `Some` clears once the deadline
    /// passes (the 3-second banner variant).
    expires_at: Option<DateTime<Utc>>,
}

pub struct SectionEditor<A: SectionApi> {
    schema: &'static SectionSchema,
    api: A,
    record: SectionRecord,
    status: EditorStatus,
    error: Option<String>,
    success: Option<SuccessNotice>,
    offline: bool,
}

impl<A: SectionApi> SectionEditor<A> {
    /// A new editor starts on the fallback record so it is renderable
    /// before (and regardless of) the first load.
    pub fn new(schema: &'static SectionSchema, api: A) -> Self {
        Self {
            record: schema.fallback_record(),
            schema,
            api,
            status: EditorStatus::Loading,
            error: None,
            success: None,
            offline: false,
        }
    }

    pub fn schema(&self) -> &'static SectionSchema {
        self.schema
    }

    pub fn record(&self) -> &SectionRecord {
        &self.record
    }

    pub fn status(&self) -> EditorStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success.as_ref().map(|n| n.message.as_str())
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Fetch the current record. Read failures never leave the form
    /// unrenderable: any failure substitutes the fallback content.
    pub async fn load(&mut self) {
        self.status = EditorStatus::Loading;
        self.error = None;

        match self
            .api
            .get_section(self.schema.page, self.schema.section)
            .await
        {
            Ok(Some(record)) => {
                self.record = record;
                self.status = EditorStatus::Ready;
                self.offline = false;
            }
            Ok(None) => {
                // Not created yet; pre-fill with placeholder content
                self.record = self.schema.fallback_record();
                self.status = EditorStatus::ReadyWithFallback;
                self.offline = false;
            }
            Err(ApiError::Unavailable(reason)) => {
                tracing::warn!(
                    section = %self.schema.key(),
                    "Backend unavailable, using fallback content: {}",
                    reason
                );
                self.record = self.schema.fallback_record();
                self.status = EditorStatus::ReadyWithFallback;
                // Banner suppressed; remembered for the next save attempt
                self.offline = true;
            }
            Err(e) => {
                self.record = self.schema.fallback_record();
                self.status = EditorStatus::ReadyWithFallback;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Validate and save the submitted values, then reload so the form
    /// shows the record as the backend stored it.
    pub async fn submit(&mut self, values: SectionRecord) -> Result<(), EditorError> {
        if let Err(e) = validate(self.schema, &values) {
            self.error = Some(e.to_string());
            return Err(e.into());
        }
        self.error = None;
        self.status = EditorStatus::Saving;

        match self
            .api
            .save_section(self.schema.page, self.schema.section, &values)
            .await
        {
            Ok(_) => {
                self.set_success("Saved");
                self.load().await;
                Ok(())
            }
            Err(e) if self.schema.demo_mode_save => {
                // Demo editing: commit locally and report success anyway
                tracing::warn!(
                    section = %self.schema.key(),
                    "Save failed, committing locally (demo mode): {}",
                    e
                );
                self.record = values;
                self.status = EditorStatus::Ready;
                self.set_success("Saved (demo mode)");
                Ok(())
            }
            Err(e) => {
                self.status = EditorStatus::Ready;
                self.error = Some(if self.offline {
                    "Backend unavailable, changes were not saved".to_string()
                } else {
                    e.to_string()
                });
                Err(e.into())
            }
        }
    }

    /// Upload an image and write the returned URL into the record, either
    /// the single image field or the slide at `slide_index`.
    pub async fn upload_image(
        &mut self,
        file: UploadFile,
        slide_index: Option<usize>,
    ) -> Result<String, EditorError> {
        if let Err(e) = check_upload(&file.content_type, file.bytes.len()) {
            self.error = Some(e.to_string());
            return Err(e.into());
        }
        if let Some(i) = slide_index {
            if i >= self.record.slides.len() {
                let err = EditorError::SlideOutOfRange(i);
                self.error = Some(err.to_string());
                return Err(err);
            }
        }

        let url = match self.api.upload_image(file).await {
            Ok(url) => url,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };
        let url = normalize_asset_url(self.api.base_url(), &url);

        match slide_index {
            Some(i) => self.record.slides[i] = url.clone(),
            None => self.record.image_url = Some(url.clone()),
        }
        self.error = None;
        Ok(url)
    }

    /// Append an empty slide placeholder to the form state.
    pub fn add_slide(&mut self) {
        self.record.slides.push(String::new());
    }

    /// Remove the slide at `index`, preserving the order of the rest.
    pub fn remove_slide(&mut self, index: usize) -> Result<(), EditorError> {
        if index >= self.record.slides.len() {
            return Err(EditorError::SlideOutOfRange(index));
        }
        if self.record.slides.len() <= self.schema.min_slides {
            return Err(EditorError::MinSlides(self.schema.min_slides));
        }
        self.record.slides.remove(index);
        Ok(())
    }

    /// Expire the transient success banner.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if let Some(notice) = &self.success {
            match notice.expires_at {
                None => self.success = None,
                Some(deadline) if now >= deadline => self.success = None,
                Some(_) => {}
            }
        }
    }

    fn set_success(&mut self, message: &str) {
        self.success = Some(SuccessNotice {
            message: message.to_string(),
            expires_at: self
                .schema
                .success_linger_secs
                .map(|secs| Utc::now() + Duration::seconds(secs as i64)),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::schema;
    use crate::sections::MAX_UPLOAD_BYTES;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Get,
        Save(SectionRecord),
        Upload(String),
    }

    /// Scriptable SectionApi that records every call it receives.
    struct MockApi {
        calls: Mutex<Vec<Call>>,
        get_result: Mutex<Option<Result<Option<SectionRecord>, ApiError>>>,
        save_result: Mutex<Option<Result<SectionRecord, ApiError>>>,
        upload_result: Mutex<Option<Result<String, ApiError>>>,
        base: String,
    }

    impl MockApi {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                get_result: Mutex::new(None),
                save_result: Mutex::new(None),
                upload_result: Mutex::new(None),
                base: "http://localhost:8080".to_string(),
            }
        }

        fn with_get(self, result: Result<Option<SectionRecord>, ApiError>) -> Self {
            *self.get_result.lock().unwrap() = Some(result);
            self
        }

        fn with_save(self, result: Result<SectionRecord, ApiError>) -> Self {
            *self.save_result.lock().unwrap() = Some(result);
            self
        }

        fn with_upload(self, result: Result<String, ApiError>) -> Self {
            *self.upload_result.lock().unwrap() = Some(result);
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SectionApi for &MockApi {
        async fn get_section(
            &self,
            _page: &str,
            _section: &str,
        ) -> Result<Option<SectionRecord>, ApiError> {
            self.calls.lock().unwrap().push(Call::Get);
            self.get_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(None))
        }

        async fn save_section(
            &self,
            _page: &str,
            _section: &str,
            record: &SectionRecord,
        ) -> Result<SectionRecord, ApiError> {
            self.calls.lock().unwrap().push(Call::Save(record.clone()));
            self.save_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(record.clone()))
        }

        async fn upload_image(&self, file: UploadFile) -> Result<String, ApiError> {
            self.calls.lock().unwrap().push(Call::Upload(file.file_name));
            self.upload_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok("/uploads/mock.png".to_string()))
        }

        fn base_url(&self) -> &str {
            &self.base
        }
    }

    fn contact_hero() -> &'static schema::SectionSchema {
        schema::find("contact", "hero").unwrap()
    }

    fn valid_record() -> SectionRecord {
        SectionRecord {
            title: "CONTACT US".to_string(),
            ..Default::default()
        }
    }

    fn png(len: usize) -> UploadFile {
        UploadFile {
            file_name: "banner.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0u8; len],
        }
    }

    #[tokio::test]
    async fn load_replaces_state_on_success() {
        let stored = SectionRecord {
            id: Some(7),
            title: "Reach Us".to_string(),
            ..Default::default()
        };
        let api = MockApi::new().with_get(Ok(Some(stored.clone())));
        let mut editor = SectionEditor::new(contact_hero(), &api);

        editor.load().await;

        assert_eq!(editor.record(), &stored);
        assert_eq!(editor.status(), EditorStatus::Ready);
        assert!(editor.error().is_none());
    }

    #[tokio::test]
    async fn load_failure_falls_back_to_hardcoded_content() {
        let api = MockApi::new().with_get(Err(ApiError::Http {
            status: 500,
            message: "boom".to_string(),
        }));
        let mut editor = SectionEditor::new(contact_hero(), &api);

        editor.load().await;

        assert_eq!(editor.record().title, "CONTACT US");
        assert_eq!(editor.status(), EditorStatus::ReadyWithFallback);
        assert!(editor.error().is_some());
    }

    #[tokio::test]
    async fn unavailable_backend_suppresses_the_error_banner() {
        let api =
            MockApi::new().with_get(Err(ApiError::Unavailable("connection refused".to_string())));
        let mut editor = SectionEditor::new(contact_hero(), &api);

        editor.load().await;

        assert_eq!(editor.record().title, "CONTACT US");
        assert_eq!(editor.status(), EditorStatus::ReadyWithFallback);
        assert!(editor.error().is_none());
        assert!(editor.is_offline());
    }

    #[tokio::test]
    async fn missing_record_prefills_fallback_without_error() {
        let api = MockApi::new().with_get(Ok(None));
        let mut editor = SectionEditor::new(contact_hero(), &api);

        editor.load().await;

        assert_eq!(editor.record().title, "CONTACT US");
        assert!(editor.error().is_none());
        assert!(!editor.is_offline());
    }

    #[tokio::test]
    async fn empty_title_is_rejected_without_a_save_call() {
        let api = MockApi::new();
        let mut editor = SectionEditor::new(contact_hero(), &api);

        let result = editor.submit(SectionRecord::default()).await;

        assert!(matches!(
            result,
            Err(EditorError::Validation(ValidationError::MissingTitle))
        ));
        assert!(editor.error().is_some());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn required_image_is_enforced_before_saving() {
        let schema = schema::find("green-mobility", "hero").unwrap();
        let api = MockApi::new();
        let mut editor = SectionEditor::new(schema, &api);

        let values = SectionRecord {
            title: "GREEN MOBILITY".to_string(),
            ..Default::default()
        };
        let result = editor.submit(values).await;

        assert!(matches!(
            result,
            Err(EditorError::Validation(ValidationError::MissingImage))
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn successful_save_reloads_and_adopts_server_state() {
        // The backend normalizes the record (assigns an id, trims, etc.)
        let normalized = SectionRecord {
            id: Some(42),
            title: "CONTACT US".to_string(),
            ..Default::default()
        };
        let api = MockApi::new()
            .with_save(Ok(normalized.clone()))
            .with_get(Ok(Some(normalized.clone())));
        let mut editor = SectionEditor::new(contact_hero(), &api);

        editor.submit(valid_record()).await.unwrap();

        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], Call::Save(_)));
        assert_eq!(calls[1], Call::Get);
        assert_eq!(editor.record(), &normalized);
        assert_eq!(editor.success_message(), Some("Saved"));
    }

    #[tokio::test]
    async fn failed_save_keeps_the_form_open_with_an_error() {
        let api = MockApi::new().with_save(Err(ApiError::Http {
            status: 500,
            message: "write failed".to_string(),
        }));
        let mut editor = SectionEditor::new(contact_hero(), &api);

        let result = editor.submit(valid_record()).await;

        assert!(result.is_err());
        assert_eq!(editor.status(), EditorStatus::Ready);
        assert!(editor.error().unwrap().contains("write failed"));
        // Save attempted, but no reload afterwards
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn offline_save_shows_the_contextual_message() {
        let api = MockApi::new()
            .with_get(Err(ApiError::Unavailable("refused".to_string())))
            .with_save(Err(ApiError::Unavailable("refused".to_string())));
        let mut editor = SectionEditor::new(contact_hero(), &api);

        editor.load().await;
        assert!(editor.error().is_none());

        let result = editor.submit(valid_record()).await;
        assert!(result.is_err());
        assert_eq!(
            editor.error(),
            Some("Backend unavailable, changes were not saved")
        );
    }

    #[tokio::test]
    async fn demo_mode_commits_locally_when_the_backend_is_down() {
        let schema = schema::find("about", "hero").unwrap();
        let api = MockApi::new().with_save(Err(ApiError::Unavailable("refused".to_string())));
        let mut editor = SectionEditor::new(schema, &api);

        let values = SectionRecord {
            title: "Our Story".to_string(),
            slides: vec!["/uploads/new.jpg".to_string()],
            ..Default::default()
        };
        editor.submit(values.clone()).await.unwrap();

        assert_eq!(editor.record(), &values);
        assert_eq!(editor.success_message(), Some("Saved (demo mode)"));
        assert!(editor.error().is_none());
    }

    #[tokio::test]
    async fn non_image_upload_is_rejected_without_a_network_call() {
        let api = MockApi::new();
        let mut editor = SectionEditor::new(contact_hero(), &api);

        let file = UploadFile {
            file_name: "notes.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: vec![0u8; 10],
        };
        let result = editor.upload_image(file, None).await;

        assert!(matches!(
            result,
            Err(EditorError::Validation(ValidationError::NotAnImage))
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_without_a_network_call() {
        let api = MockApi::new();
        let mut editor = SectionEditor::new(contact_hero(), &api);

        let result = editor.upload_image(png(MAX_UPLOAD_BYTES + 1), None).await;

        assert!(matches!(
            result,
            Err(EditorError::Validation(ValidationError::TooLarge))
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn upload_to_a_missing_slide_sets_the_banner_without_a_network_call() {
        let schema = schema::find("esg", "hero").unwrap();
        let api = MockApi::new();
        let mut editor = SectionEditor::new(schema, &api);
        assert_eq!(editor.record().slides.len(), 1);

        let result = editor.upload_image(png(16), Some(5)).await;

        assert!(matches!(result, Err(EditorError::SlideOutOfRange(5))));
        assert_eq!(editor.error(), Some("No slide at index 5"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn upload_rewrites_the_image_field_with_a_normalized_url() {
        let api = MockApi::new().with_upload(Ok("/uploads/banner.png".to_string()));
        let mut editor = SectionEditor::new(contact_hero(), &api);

        let url = editor.upload_image(png(16), None).await.unwrap();

        assert_eq!(url, "http://localhost:8080/uploads/banner.png");
        assert_eq!(editor.record().image_url.as_deref(), Some(url.as_str()));
    }

    #[tokio::test]
    async fn upload_targets_the_requested_slide() {
        let schema = schema::find("esg", "hero").unwrap();
        let api = MockApi::new().with_upload(Ok("/uploads/slide.png".to_string()));
        let mut editor = SectionEditor::new(schema, &api);
        editor.add_slide();
        // fallback slide + new empty one
        assert_eq!(editor.record().slides.len(), 2);

        editor.upload_image(png(16), Some(1)).await.unwrap();

        assert_eq!(
            editor.record().slides[1],
            "http://localhost:8080/uploads/slide.png"
        );
        // Slide 0 untouched
        assert_eq!(editor.record().slides[0], "/assets/img/esg-hero-1.jpg");
    }

    #[tokio::test]
    async fn remove_slide_preserves_relative_order() {
        let schema = schema::find("about", "hero").unwrap();
        let api = MockApi::new();
        let mut editor = SectionEditor::new(schema, &api);
        editor.record.slides = vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "d".to_string(),
        ];

        editor.remove_slide(1).unwrap();

        assert_eq!(editor.record().slides, vec!["a", "c", "d"]);
    }

    #[tokio::test]
    async fn last_slide_cannot_be_removed_when_schema_requires_one() {
        let schema = schema::find("esg", "hero").unwrap();
        let api = MockApi::new();
        let mut editor = SectionEditor::new(schema, &api);
        assert_eq!(editor.record().slides.len(), 1);

        let result = editor.remove_slide(0);

        assert!(matches!(result, Err(EditorError::MinSlides(1))));
        assert_eq!(editor.record().slides.len(), 1);
    }

    #[tokio::test]
    async fn add_slide_appends_an_empty_placeholder() {
        let schema = schema::find("about", "hero").unwrap();
        let api = MockApi::new();
        let mut editor = SectionEditor::new(schema, &api);
        let before = editor.record().slides.len();

        editor.add_slide();

        assert_eq!(editor.record().slides.len(), before + 1);
        assert_eq!(editor.record().slides.last().map(String::as_str), Some(""));
    }

    #[tokio::test]
    async fn success_banner_expires_after_the_linger_window() {
        // contact/hero lingers for 3 seconds
        let api = MockApi::new();
        let mut editor = SectionEditor::new(contact_hero(), &api);
        editor.submit(valid_record()).await.unwrap();
        assert!(editor.success_message().is_some());

        editor.tick(Utc::now() + Duration::seconds(1));
        assert!(editor.success_message().is_some());

        editor.tick(Utc::now() + Duration::seconds(4));
        assert!(editor.success_message().is_none());
    }

    #[tokio::test]
    async fn immediate_variant_clears_the_banner_on_first_tick() {
        let schema = schema::find("contact", "details").unwrap();
        let api = MockApi::new();
        let mut editor = SectionEditor::new(schema, &api);
        editor
            .submit(SectionRecord {
                title: "Registered Office".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(editor.success_message().is_some());

        editor.tick(Utc::now());
        assert!(editor.success_message().is_none());
    }
}
