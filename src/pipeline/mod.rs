//! Stage-gated production pipeline.
//!
//! This module provides:
//! - `stage`: the fixed stage order and the admission gate
//! - `model`: artifact types (Idea, ScriptVersion, BRollPrompt, VideoClip)
//! - `store`: the per-session ArtifactStore with id-keyed collections
//! - `script`: content-line extraction from script text
//! - `state`: PipelineState, the owned session value
//! - `controller`: PipelineController, the single mutation surface

pub mod controller;
pub mod model;
pub mod script;
pub mod stage;
pub mod state;
pub mod store;

pub use controller::{PipelineController, Transition, UnitReport};
pub use model::*;
pub use script::{script_lines, ScriptStats};
pub use stage::{can_enter, reachable_stages, Stage, StageStatus};
pub use state::PipelineState;
pub use store::ArtifactStore;
