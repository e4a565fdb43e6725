//! videostudio - Stage-gated content production pipeline.
//!
//! An idea is selected, turned into a script, decomposed into b-roll prompts,
//! then rendered into video clips. The crate owns the part with real rules:
//!
//! - **Stage gate**: which stage is reachable from where, given what is completed
//! - **Artifact store**: each stage's outputs, keyed by id, replaced atomically
//! - **Generator adapter**: one async task per unit, completions by channel
//! - **Controller**: the single mutation surface tying the three together
//!
//! Content generation itself is pluggable through [`ContentGenerator`];
//! [`MockGenerator`] is a deterministic stand-in.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use videostudio::{MockDelays, MockGenerator, PipelineController, Settings, Stage};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> videostudio::StudioResult<()> {
//! let generator = MockGenerator::new().with_delays(MockDelays::instant());
//! let mut controller = PipelineController::new(
//!     Arc::new(generator),
//!     Settings::new().with_credential("key"),
//! );
//!
//! controller.generate_ideas()?;
//! controller.run_until_idle().await;
//!
//! let first = controller.artifacts().ideas()[0].id.clone();
//! controller.approve_idea(&first)?;
//! controller.advance();
//! assert_eq!(controller.state().current_stage(), Stage::Script);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod pipeline;

// Re-exports for convenience
pub use config::Settings;
pub use error::{Blocked, StudioError, StudioResult};
pub use generator::{ContentGenerator, GeneratorError, MockDelays, MockGenerator};
pub use pipeline::{
    ArtifactStore, PipelineController, PipelineState, Stage, StageStatus, Transition, UnitReport,
};
