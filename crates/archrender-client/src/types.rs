//! Request and response types, one pair per endpoint.

use archrender_core::{FormPayload, TranslatedPayload};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    pub image_base64: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest {
    pub form_data: FormPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateResponse {
    pub translated_data_en: TranslatedPayload,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body for `POST /render`.
#[derive(Debug, Clone, Serialize)]
pub struct RenderRequest {
    pub image_base64: String,
    /// Legacy wire name: the backend reads the translated payload from
    /// `form_data_vi`.
    #[serde(rename = "form_data_vi")]
    pub form_data: TranslatedPayload,
    pub aspect_ratio: String,
    pub viewpoint: String,
    /// Omitted entirely when no reference is active, never sent as null.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_image_base64: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderResponse {
    pub generated_image_base64: String,
    #[serde(default = "default_png")]
    pub mime_type: String,
}

fn default_png() -> String {
    "image/png".to_string()
}

/// One lot on the site plan for a planning render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningLot {
    pub lot_number: String,
    pub description: String,
}

/// Body for `POST /planning/detail-render`.
#[derive(Debug, Clone, Serialize)]
pub struct PlanningRequest {
    pub site_plan_base64: String,
    pub lot_map_base64: String,
    pub lot_descriptions: Vec<PlanningLot>,
    pub camera_angle: String,
    pub time_of_day: String,
    pub aspect_ratio: String,
    pub style_keywords: String,
}

impl PlanningRequest {
    /// Mirror the backend's lot validation so a malformed request never
    /// leaves the client.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.lot_descriptions.is_empty() {
            return Err(ClientError::InvalidInput(
                "lot_descriptions must be a non-empty array".to_string(),
            ));
        }
        for lot in &self.lot_descriptions {
            if lot.lot_number.is_empty() || lot.description.is_empty() {
                return Err(ClientError::InvalidInput(
                    "each lot must have lot_number and description".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for PlanningRequest {
    fn default() -> Self {
        Self {
            site_plan_base64: String::new(),
            lot_map_base64: String::new(),
            lot_descriptions: Vec::new(),
            camera_angle: "drone_45deg".to_string(),
            time_of_day: "golden_hour".to_string(),
            aspect_ratio: "16:9".to_string(),
            style_keywords: String::new(),
        }
    }
}

/// The reference library list call returns one of two shapes: category names
/// to drill into, or a flat page of image descriptors.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReferenceListing {
    Categories { categories: Vec<String> },
    Images { images: Vec<ReferenceDescriptor> },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest {
    pub image_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadResponse {
    pub base64: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpscaleRequest {
    pub image_base64: String,
    pub scale: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpscaleResponse {
    /// Full data URI, e.g. `data:image/png;base64,...`.
    pub upscaled_image_base64: String,
    pub original_resolution: String,
    pub upscaled_resolution: String,
    pub scale: u8,
    pub cost_estimate: f64,
    #[serde(default = "default_png")]
    pub mime_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CostEstimate {
    pub scale: u8,
    pub cost_estimate: f64,
    #[serde(default)]
    pub processing_time_estimate: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub features: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_request_omits_absent_reference() {
        let request = RenderRequest {
            image_base64: "c2tldGNo".to_string(),
            form_data: TranslatedPayload::default(),
            aspect_ratio: "4:3".to_string(),
            viewpoint: "perspective".to_string(),
            reference_image_base64: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(
            json.get("reference_image_base64").is_none(),
            "absent reference must not appear in the body at all"
        );
        assert!(json.get("form_data_vi").is_some());
        assert!(json.get("form_data").is_none());
    }

    #[test]
    fn render_request_includes_present_reference() {
        let request = RenderRequest {
            image_base64: "c2tldGNo".to_string(),
            form_data: TranslatedPayload::default(),
            aspect_ratio: "4:3".to_string(),
            viewpoint: "perspective".to_string(),
            reference_image_base64: Some("cmVm".to_string()),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["reference_image_base64"], "cmVm");
    }

    #[test]
    fn render_response_defaults_mime() {
        // /planning/detail-render answers without a mime_type field.
        let response: RenderResponse =
            serde_json::from_str(r#"{"generated_image_base64": "aW1n"}"#).unwrap();
        assert_eq!(response.mime_type, "image/png");
    }

    #[test]
    fn listing_parses_categories_shape() {
        let listing: ReferenceListing =
            serde_json::from_str(r#"{"categories": ["residential", "commercial"]}"#).unwrap();
        match listing {
            ReferenceListing::Categories { categories } => {
                assert_eq!(categories, vec!["residential", "commercial"]);
            }
            ReferenceListing::Images { .. } => panic!("parsed as images"),
        }
    }

    #[test]
    fn listing_parses_images_shape() {
        let listing: ReferenceListing = serde_json::from_str(
            r#"{"images": [
                {"id": "r-001", "name": "Glass house", "thumbnail_url": "https://cdn/th/r-001.jpg"},
                {"id": "r-002", "name": "Brick mews"}
            ]}"#,
        )
        .unwrap();
        match listing {
            ReferenceListing::Images { images } => {
                assert_eq!(images.len(), 2);
                assert_eq!(images[0].id, "r-001");
                assert!(images[1].thumbnail_url.is_none());
            }
            ReferenceListing::Categories { .. } => panic!("parsed as categories"),
        }
    }

    #[test]
    fn planning_request_rejects_empty_lots() {
        let request = PlanningRequest {
            site_plan_base64: "cA==".to_string(),
            lot_map_base64: "bQ==".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            request.validate(),
            Err(ClientError::InvalidInput(_))
        ));
    }

    #[test]
    fn planning_request_rejects_incomplete_lot() {
        let request = PlanningRequest {
            site_plan_base64: "cA==".to_string(),
            lot_map_base64: "bQ==".to_string(),
            lot_descriptions: vec![PlanningLot {
                lot_number: "1".to_string(),
                description: String::new(),
            }],
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn planning_request_accepts_complete_lots() {
        let request = PlanningRequest {
            site_plan_base64: "cA==".to_string(),
            lot_map_base64: "bQ==".to_string(),
            lot_descriptions: vec![PlanningLot {
                lot_number: "1".to_string(),
                description: "3-storey residential, modern style".to_string(),
            }],
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn planning_request_defaults() {
        let request = PlanningRequest::default();
        assert_eq!(request.camera_angle, "drone_45deg");
        assert_eq!(request.time_of_day, "golden_hour");
        assert_eq!(request.aspect_ratio, "16:9");
    }

    #[test]
    fn upscale_response_shape() {
        let response: UpscaleResponse = serde_json::from_str(
            r#"{
                "upscaled_image_base64": "data:image/png;base64,aW1n",
                "original_resolution": "1024x768",
                "upscaled_resolution": "2048x1536",
                "scale": 2,
                "cost_estimate": 0.025,
                "mime_type": "image/png"
            }"#,
        )
        .unwrap();
        assert_eq!(response.scale, 2);
        assert_eq!(response.upscaled_resolution, "2048x1536");
    }
}
