//! Render orchestration: the session state store, the
//! analyze → translate → render state machine, and reference picking.

mod orchestrator;
mod reference;
mod session;

pub use orchestrator::{Flow, Orchestrator, PipelineError, RenderBackend};
pub use reference::ReferenceSource;
pub use session::{Phase, Session};
