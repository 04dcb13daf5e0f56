//! The HTTP client itself: one method per backend endpoint.

use std::time::Duration;

use archrender_core::{AnalysisResult, FormPayload, ImageData, TranslatedPayload};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{ClientError, error_from_body};
use crate::types::{
    AnalyzeRequest, CostEstimate, DownloadRequest, DownloadResponse, HealthStatus,
    PlanningRequest, ReferenceListing, RenderRequest, RenderResponse, TranslateRequest,
    TranslateResponse, UpscaleRequest, UpscaleResponse,
};

/// Total per-request timeout. Render and upscale are long-running generative
/// calls; analyze typically answers within seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the ArchRender backend.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL (no trailing slash needed;
    /// include any `/api` prefix the deployment uses).
    pub fn new(base_url: String) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom total request timeout.
    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Analyze a sketch into structured attributes.
    pub async fn analyze_sketch(&self, image: &ImageData) -> Result<AnalysisResult, ClientError> {
        info!(mime = %image.mime_type, "analyzing sketch");
        self.post_json(
            "/analyze-sketch",
            &AnalyzeRequest {
                image_base64: image.base64.clone(),
            },
        )
        .await
    }

    /// Translate the current form into the canonical render payload.
    pub async fn translate_prompt(
        &self,
        form: &FormPayload,
    ) -> Result<TranslatedPayload, ClientError> {
        info!("translating form payload");
        let response: TranslateResponse = self
            .post_json(
                "/translate-prompt",
                &TranslateRequest {
                    form_data: form.clone(),
                },
            )
            .await?;
        Ok(response.translated_data_en)
    }

    /// Generate a render from a sketch and a translated payload.
    pub async fn render(&self, request: &RenderRequest) -> Result<RenderResponse, ClientError> {
        info!(
            aspect_ratio = %request.aspect_ratio,
            viewpoint = %request.viewpoint,
            with_reference = request.reference_image_base64.is_some(),
            "requesting render"
        );
        self.post_json("/render", request).await
    }

    /// Generate an urban-planning render from a site plan and lot map.
    pub async fn detail_render(
        &self,
        request: &PlanningRequest,
    ) -> Result<RenderResponse, ClientError> {
        request.validate()?;
        info!(lots = request.lot_descriptions.len(), "requesting planning render");
        self.post_json("/planning/detail-render", request).await
    }

    /// List the reference library, optionally scoped to a category.
    ///
    /// The response is two-shaped: top-level calls may answer with category
    /// names to drill into, scoped calls with image descriptors.
    pub async fn list_references(
        &self,
        category: Option<&str>,
    ) -> Result<ReferenceListing, ClientError> {
        info!(category = category.unwrap_or("<all>"), "listing references");
        let query: Vec<(&str, &str)> = match category {
            Some(c) => vec![("category", c)],
            None => Vec::new(),
        };
        self.get_json("/references/list", &query).await
    }

    /// Download a library image by id.
    pub async fn download_reference(
        &self,
        image_id: &str,
    ) -> Result<DownloadResponse, ClientError> {
        info!(image_id, "downloading reference image");
        self.post_json(
            "/references/download",
            &DownloadRequest {
                image_id: image_id.to_string(),
            },
        )
        .await
    }

    /// Upscale a rendered image. `scale` must be 2 or 4.
    pub async fn upscale(
        &self,
        image: &ImageData,
        scale: u8,
    ) -> Result<UpscaleResponse, ClientError> {
        validate_scale(scale)?;
        info!(scale, "upscaling image");
        self.post_json(
            "/upscale",
            &UpscaleRequest {
                image_base64: image.base64.clone(),
                scale,
            },
        )
        .await
    }

    /// Estimate the cost of an upscale without running it.
    pub async fn estimate_upscale_cost(&self, scale: u8) -> Result<CostEstimate, ClientError> {
        validate_scale(scale)?;
        self.post_json("/upscale/estimate-cost", &serde_json::json!({ "scale": scale }))
            .await
    }

    /// Backend health and feature flags.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.get_json("/health", &[]).await
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        Self::read_json(response).await
    }

    async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<R, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET");
        let response = self.client.get(&url).query(query).send().await?;
        Self::read_json(response).await
    }

    /// Consume a response. The body is read exactly once, as text, whatever
    /// the status; error normalisation and JSON parsing both work from that
    /// single read.
    async fn read_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

fn validate_scale(scale: u8) -> Result<(), ClientError> {
    if scale == 2 || scale == 4 {
        Ok(())
    } else {
        Err(ClientError::InvalidInput(format!(
            "scale must be 2 or 4, got {scale}"
        )))
    }
}
