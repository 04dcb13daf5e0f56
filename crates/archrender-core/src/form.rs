//! Form payloads: the user-editable render description and its translation.
//!
//! [`FormPayload`] merges analysis output with manual edits and is the single
//! source the translate step reads. [`TranslatedPayload`] is the canonical
//! English form the render backend expects; it must be regenerated whenever
//! the form changes, which is the caller's responsibility.

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, TechnicalSpecs};

/// Sketch adherence range accepted by the render backend.
pub const ADHERENCE_MIN: f32 = 0.5;
pub const ADHERENCE_MAX: f32 = 1.0;

/// The user-editable render form.
///
/// Starts from defaults, gets overwritten field-by-field when an analysis
/// arrives, and stays freely editable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormPayload {
    pub building_type: String,
    pub facade_style: String,
    /// The user's specific request, in their own words.
    pub description: String,
    pub style_keywords: String,
    pub negative_prompt: String,
    /// 0.5 = flexible geometry, 1.0 = pixel-perfect. See [`ADHERENCE_MIN`].
    pub sketch_adherence: f32,
    pub aspect_ratio: String,
    pub viewpoint: String,
    pub floor_count: Option<String>,
    pub critical_elements: Vec<String>,
    pub materials_precise: Vec<String>,
    pub environment: Vec<String>,
    pub technical_specs: TechnicalSpecs,
}

impl Default for FormPayload {
    fn default() -> Self {
        Self {
            building_type: String::new(),
            facade_style: String::new(),
            description: String::new(),
            style_keywords: String::new(),
            negative_prompt: String::new(),
            sketch_adherence: 0.85,
            aspect_ratio: "4:3".to_string(),
            viewpoint: "perspective".to_string(),
            floor_count: None,
            critical_elements: Vec::new(),
            materials_precise: Vec::new(),
            environment: Vec::new(),
            technical_specs: TechnicalSpecs::default(),
        }
    }
}

impl FormPayload {
    /// Merge an analysis into the form.
    ///
    /// Only fields the analysis actually carries are overwritten; everything
    /// else keeps its prior (or default) value.
    pub fn apply_analysis(&mut self, analysis: &AnalysisResult) {
        if let Some(building_type) = &analysis.building_type {
            self.building_type.clone_from(building_type);
        }
        if let Some(facade_style) = &analysis.facade_style {
            self.facade_style.clone_from(facade_style);
        }
        if analysis.floor_count.is_some() {
            self.floor_count.clone_from(&analysis.floor_count);
        }
        if !analysis.critical_elements.is_empty() {
            self.critical_elements.clone_from(&analysis.critical_elements);
        }
        if !analysis.materials_precise.is_empty() {
            self.materials_precise.clone_from(&analysis.materials_precise);
        }
        if !analysis.environment.is_empty() {
            self.environment.clone_from(&analysis.environment);
        }
        if let Some(specs) = &analysis.technical_specs {
            self.technical_specs = specs.clone();
        }
        // Pre-fill the description from detected attributes; a description
        // the user already wrote is kept.
        if self.description.is_empty() {
            let mut parts: Vec<&str> = Vec::new();
            if let Some(building_type) = &analysis.building_type {
                parts.push(building_type);
            }
            if let Some(facade_style) = &analysis.facade_style {
                parts.push(facade_style);
            }
            self.description = parts.join(", ");
        }
    }

    /// Set the sketch adherence weight, clamped to the accepted range.
    pub fn set_sketch_adherence(&mut self, value: f32) {
        self.sketch_adherence = value.clamp(ADHERENCE_MIN, ADHERENCE_MAX);
    }
}

/// The form translated into the canonical language the render backend expects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatedPayload {
    pub building_type: String,
    pub facade_style: String,
    pub critical_elements: Vec<String>,
    pub materials_precise: Vec<String>,
    pub environment: Vec<String>,
    pub technical_specs: TechnicalSpecs,
    /// Fields the translator adds beyond the required set travel unchanged.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TranslatedPayload {
    /// Required fields the translator must populate, mirroring the backend's
    /// own completeness check. Empty means the payload is render-ready.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.building_type.is_empty() {
            missing.push("building_type");
        }
        if self.facade_style.is_empty() {
            missing.push("facade_style");
        }
        if self.critical_elements.is_empty() {
            missing.push("critical_elements");
        }
        if self.materials_precise.is_empty() {
            missing.push("materials_precise");
        }
        if self.environment.is_empty() {
            missing.push("environment");
        }
        missing
    }
}
