//! HTTP client for the ArchRender backend: one typed method per endpoint,
//! with a tagged error model that keeps transport failures, HTTP failures,
//! and parse failures distinguishable.

mod api;
mod error;
mod types;

pub use api::{ApiClient, DEFAULT_TIMEOUT};
pub use error::{ClientError, error_from_body};
pub use types::{
    AnalyzeRequest, CostEstimate, DownloadRequest, DownloadResponse, HealthStatus, PlanningLot,
    PlanningRequest, ReferenceDescriptor, ReferenceListing, RenderRequest, RenderResponse,
    TranslateRequest, TranslateResponse, UpscaleRequest, UpscaleResponse,
};
