//! The session state store.
//!
//! One [`Session`] lives for one editing session and is only ever mutated by
//! the flow that currently owns the phase. The phase field is the in-flight
//! guard: a flow may only start from [`Phase::Idle`], so at most one
//! analyze/translate/render cycle runs at a time.

use archrender_core::{AnalysisResult, FormPayload, ImageData, TranslatedPayload};
use tracing::debug;

/// Which step of the pipeline currently owns the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Analyzing,
    Translating,
    Rendering,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::Translating => "translating",
            Self::Rendering => "rendering",
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

/// All per-session state: uploaded images, the editable form, and the
/// artefacts each pipeline step produced.
#[derive(Debug, Default)]
pub struct Session {
    sketch: Option<ImageData>,
    reference: Option<ImageData>,
    analysis: Option<AnalysisResult>,
    form: FormPayload,
    translated: Option<TranslatedPayload>,
    rendered: Option<ImageData>,
    last_error: Option<String>,
    phase: Phase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sketch(&self) -> Option<&ImageData> {
        self.sketch.as_ref()
    }

    /// Install a sketch, replacing any previous upload.
    pub fn set_sketch(&mut self, image: ImageData) {
        self.sketch = Some(image);
    }

    pub fn reference(&self) -> Option<&ImageData> {
        self.reference.as_ref()
    }

    pub fn set_reference(&mut self, image: ImageData) {
        self.reference = Some(image);
    }

    pub fn clear_reference(&mut self) {
        self.reference = None;
    }

    /// Copy the last render result into the reference slot. Returns false
    /// when nothing has been rendered yet.
    pub fn promote_render_to_reference(&mut self) -> bool {
        match &self.rendered {
            Some(image) => {
                self.reference = Some(image.clone());
                true
            }
            None => false,
        }
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn set_analysis(&mut self, analysis: AnalysisResult) {
        self.analysis = Some(analysis);
    }

    pub fn form(&self) -> &FormPayload {
        &self.form
    }

    /// Edits through this handle do not invalidate a stored translation;
    /// re-running translate before render is the caller's responsibility.
    pub fn form_mut(&mut self) -> &mut FormPayload {
        &mut self.form
    }

    pub fn translated(&self) -> Option<&TranslatedPayload> {
        self.translated.as_ref()
    }

    pub fn set_translated(&mut self, translated: TranslatedPayload) {
        self.translated = Some(translated);
    }

    pub fn rendered(&self) -> Option<&ImageData> {
        self.rendered.as_ref()
    }

    pub fn set_rendered(&mut self, image: ImageData) {
        self.rendered = Some(image);
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Render needs both a sketch and a translated payload.
    pub fn render_ready(&self) -> bool {
        self.sketch.is_some() && self.translated.is_some()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Claim the session for a flow. Fails when any flow is already in
    /// progress; the rejection is logged, not surfaced.
    pub fn try_enter(&mut self, phase: Phase) -> bool {
        if self.phase != Phase::Idle {
            debug!(
                current = self.phase.as_str(),
                requested = phase.as_str(),
                "flow already in progress, ignoring trigger"
            );
            return false;
        }
        self.phase = phase;
        true
    }

    /// Move an in-flight flow to its next step (analyze hands off to
    /// translate without returning to idle in between).
    pub fn advance(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Return the session to idle, whatever the flow's outcome.
    pub fn finish(&mut self) {
        self.phase = Phase::Idle;
    }
}
