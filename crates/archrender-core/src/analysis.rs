//! Structured sketch analysis returned by the backend.

use serde::{Deserialize, Serialize};

/// What the analyze step extracted from a sketch.
///
/// Every field is optional: the backend only emits what it could detect, and
/// the form merge ([`crate::FormPayload::apply_analysis`]) must leave fields
/// it does not carry untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    pub building_type: Option<String>,
    pub facade_style: Option<String>,
    /// Floor count as free text, e.g. "3 floors".
    pub floor_count: Option<String>,
    pub critical_elements: Vec<String>,
    pub materials_precise: Vec<String>,
    pub environment: Vec<String>,
    pub technical_specs: Option<TechnicalSpecs>,
    /// Sketch detection info the backend attaches alongside the analysis.
    pub sketch_detail_level: Option<String>,
    pub is_colored: Option<bool>,
    pub sketch_type: Option<String>,
}

/// Camera and material specifications for the render prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalSpecs {
    pub camera: Option<String>,
    pub lens: Option<String>,
    pub lighting: Option<String>,
    pub materials: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_response() {
        let json = r#"{
            "building_type": "Villa",
            "critical_elements": ["balcony", "flat roof"],
            "sketch_detail_level": "high",
            "is_colored": false
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.building_type.as_deref(), Some("Villa"));
        assert_eq!(result.critical_elements.len(), 2);
        assert_eq!(result.is_colored, Some(false));
        assert!(result.facade_style.is_none());
        assert!(result.materials_precise.is_empty());
        assert!(result.technical_specs.is_none());
    }

    #[test]
    fn deserializes_empty_object() {
        let result: AnalysisResult = serde_json::from_str("{}").unwrap();
        assert!(result.building_type.is_none());
        assert!(result.environment.is_empty());
    }

    #[test]
    fn technical_specs_nested() {
        let json = r#"{
            "technical_specs": {
                "camera": "eye-level",
                "lighting": "golden hour"
            }
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        let specs = result.technical_specs.unwrap();
        assert_eq!(specs.camera.as_deref(), Some("eye-level"));
        assert_eq!(specs.lighting.as_deref(), Some("golden hour"));
        assert!(specs.lens.is_none());
    }

    #[test]
    fn unknown_fields_ignored() {
        // Backends add detection fields over time; old clients must not break.
        let json = r#"{"building_type": "Townhouse", "confidence": 0.93}"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.building_type.as_deref(), Some("Townhouse"));
    }
}
