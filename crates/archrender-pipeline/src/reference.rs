//! Reference picking: attach a style-reference image to the session from a
//! local upload, the last render result, or the remote library.

use archrender_client::ReferenceListing;
use archrender_core::ImageData;
use tracing::info;

use crate::orchestrator::{Orchestrator, PipelineError, RenderBackend};

/// Where a style reference comes from.
#[derive(Debug, Clone)]
pub enum ReferenceSource {
    /// Image the user supplied directly.
    Upload(ImageData),
    /// Promote the most recent render output to reference input.
    LastRender,
    /// A remote library entry, fetched by id.
    Library { image_id: String },
}

impl<B: RenderBackend> Orchestrator<B> {
    /// Install a reference image from the given source.
    ///
    /// Library sources trigger one download call; the other sources are
    /// local. The previous reference, if any, is replaced.
    pub async fn pick_reference(&mut self, source: ReferenceSource) -> Result<(), PipelineError> {
        match source {
            ReferenceSource::Upload(image) => {
                info!(mime = %image.mime_type, "reference set from upload");
                self.session_mut().set_reference(image);
                Ok(())
            }
            ReferenceSource::LastRender => {
                if self.session_mut().promote_render_to_reference() {
                    info!("reference set from last render");
                    Ok(())
                } else {
                    Err(PipelineError::MissingInput("render result"))
                }
            }
            ReferenceSource::Library { image_id } => {
                let download = self.backend().download_reference(&image_id).await?;
                info!(%image_id, "reference set from library");
                self.session_mut().set_reference(ImageData {
                    base64: download.base64,
                    mime_type: download.mime_type,
                });
                Ok(())
            }
        }
    }

    /// Detach the active reference; subsequent renders omit the field.
    pub fn clear_reference(&mut self) {
        self.session_mut().clear_reference();
    }

    /// Browse the reference library. The listing is two-shaped: category
    /// names to drill into, or image descriptors to pick from.
    pub async fn browse_references(
        &self,
        category: Option<&str>,
    ) -> Result<ReferenceListing, PipelineError> {
        Ok(self.backend().list_references(category).await?)
    }
}
