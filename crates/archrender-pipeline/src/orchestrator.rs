//! The render orchestrator: sequences analyze → translate → render over a
//! [`Session`], guarding against concurrent invocation.
//!
//! Every flow claims the session phase on entry and returns it to idle on
//! exit, success or failure. A trigger that arrives while a flow is in
//! flight resolves to [`Flow::Busy`] without touching the network. Failures
//! surface as errors and leave previously stored artefacts untouched.

use archrender_client::{
    ApiClient, ClientError, DownloadResponse, ReferenceListing, RenderRequest, RenderResponse,
};
use archrender_core::{AnalysisResult, FormPayload, ImageData, TranslatedPayload};
use thiserror::Error;
use tracing::info;

use crate::session::{Phase, Session};

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A precondition failed; no network call was made.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Outcome of triggering a flow: it ran to completion, or the session was
/// already owned by another flow and the trigger was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow<T> {
    Done(T),
    Busy,
}

impl<T> Flow<T> {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

/// The backend surface the orchestrator drives.
///
/// [`ApiClient`] is the production implementation; tests substitute a
/// counting fake so every flow property can be checked without a network.
#[allow(async_fn_in_trait)]
pub trait RenderBackend {
    async fn analyze_sketch(&self, image: &ImageData) -> Result<AnalysisResult, ClientError>;
    async fn translate_prompt(
        &self,
        form: &FormPayload,
    ) -> Result<TranslatedPayload, ClientError>;
    async fn render(&self, request: &RenderRequest) -> Result<RenderResponse, ClientError>;
    async fn list_references(
        &self,
        category: Option<&str>,
    ) -> Result<ReferenceListing, ClientError>;
    async fn download_reference(&self, image_id: &str) -> Result<DownloadResponse, ClientError>;
}

impl RenderBackend for ApiClient {
    async fn analyze_sketch(&self, image: &ImageData) -> Result<AnalysisResult, ClientError> {
        ApiClient::analyze_sketch(self, image).await
    }

    async fn translate_prompt(
        &self,
        form: &FormPayload,
    ) -> Result<TranslatedPayload, ClientError> {
        ApiClient::translate_prompt(self, form).await
    }

    async fn render(&self, request: &RenderRequest) -> Result<RenderResponse, ClientError> {
        ApiClient::render(self, request).await
    }

    async fn list_references(
        &self,
        category: Option<&str>,
    ) -> Result<ReferenceListing, ClientError> {
        ApiClient::list_references(self, category).await
    }

    async fn download_reference(&self, image_id: &str) -> Result<DownloadResponse, ClientError> {
        ApiClient::download_reference(self, image_id).await
    }
}

/// Sequences the pipeline steps over one [`Session`].
pub struct Orchestrator<B> {
    session: Session,
    backend: B,
}

impl<B: RenderBackend> Orchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            session: Session::new(),
            backend,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Analyze the uploaded sketch and flow straight into translation.
    ///
    /// On success the analysis is stored, merged into the form, and the form
    /// is translated, making render eligible. Requires a sketch; the
    /// precondition failure makes no network call.
    pub async fn analyze(&mut self) -> Result<Flow<()>, PipelineError> {
        if !self.session.try_enter(Phase::Analyzing) {
            return Ok(Flow::Busy);
        }
        let result = self.analyze_inner().await;
        self.session.finish();
        self.record(&result);
        result.map(Flow::Done)
    }

    async fn analyze_inner(&mut self) -> Result<(), PipelineError> {
        let sketch = self
            .session
            .sketch()
            .cloned()
            .ok_or(PipelineError::MissingInput("sketch"))?;

        let analysis = self.backend.analyze_sketch(&sketch).await?;
        self.session.set_analysis(analysis.clone());
        self.session.form_mut().apply_analysis(&analysis);
        info!(
            building_type = %self.session.form().building_type,
            "analysis stored, translating"
        );

        self.session.advance(Phase::Translating);
        let translated = self.backend.translate_prompt(self.session.form()).await?;
        self.session.set_translated(translated);
        Ok(())
    }

    /// Re-translate the current form after manual edits.
    ///
    /// Always reads the live form, never a snapshot from analyze time.
    pub async fn translate(&mut self) -> Result<Flow<()>, PipelineError> {
        if !self.session.try_enter(Phase::Translating) {
            return Ok(Flow::Busy);
        }
        let result = self.translate_inner().await;
        self.session.finish();
        self.record(&result);
        result.map(Flow::Done)
    }

    async fn translate_inner(&mut self) -> Result<(), PipelineError> {
        let translated = self.backend.translate_prompt(self.session.form()).await?;
        self.session.set_translated(translated);
        Ok(())
    }

    /// Generate a render from the sketch and the stored translation.
    ///
    /// Requires both; the active reference image, when present, is attached
    /// to bias style consistency. Success replaces the stored render result
    /// and clears the error banner; failure keeps the previous result.
    pub async fn render(&mut self) -> Result<Flow<ImageData>, PipelineError> {
        if !self.session.try_enter(Phase::Rendering) {
            return Ok(Flow::Busy);
        }
        let result = self.render_inner().await;
        self.session.finish();
        self.record(&result);
        result.map(Flow::Done)
    }

    async fn render_inner(&mut self) -> Result<ImageData, PipelineError> {
        let sketch = self
            .session
            .sketch()
            .ok_or(PipelineError::MissingInput("sketch"))?;
        let translated = self
            .session
            .translated()
            .ok_or(PipelineError::MissingInput("translated form payload"))?;

        let form = self.session.form();
        let request = RenderRequest {
            image_base64: sketch.base64.clone(),
            form_data: translated.clone(),
            aspect_ratio: form.aspect_ratio.clone(),
            viewpoint: form.viewpoint.clone(),
            reference_image_base64: self.session.reference().map(|r| r.base64.clone()),
        };

        let response = self.backend.render(&request).await?;
        let image = ImageData {
            base64: response.generated_image_base64,
            mime_type: response.mime_type,
        };
        self.session.set_rendered(image.clone());
        info!(mime = %image.mime_type, "render stored");
        Ok(image)
    }

    /// Mirror a flow's outcome into the session's error banner.
    fn record<T>(&mut self, result: &Result<T, PipelineError>) {
        match result {
            Ok(_) => self.session.clear_error(),
            Err(err) => self.session.set_error(err.to_string()),
        }
    }
}
