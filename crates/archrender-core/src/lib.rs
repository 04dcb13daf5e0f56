pub mod analysis;
pub mod form;
pub mod image;

pub use analysis::{AnalysisResult, TechnicalSpecs};
pub use form::{FormPayload, TranslatedPayload};
pub use image::{ImageData, ImageError, mime_from_extension};
