//! Content generation boundary.
//!
//! Provides:
//! - `ContentGenerator`: the async capability consumed at each stage
//! - `adapter`: per-unit task dispatch with completion delivery over a channel
//! - `mock`: a deterministic generator for demos and tests

pub mod adapter;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::model::{IdeaDraft, ScriptLine};

pub use adapter::{GeneratorAdapter, UnitCompletion, UnitOutput, UnitRequest};
pub use mock::{MockDelays, MockGenerator};

/// Failure of a single generation unit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// The generator ran and reported a failure.
    #[error("generation failed: {0}")]
    Failed(String),

    /// The generator refused the request before running it.
    #[error("generator unavailable: {0}")]
    Unavailable(String),

    /// The unit was abandoned before it completed.
    #[error("generation cancelled")]
    Cancelled,
}

impl GeneratorError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Input for rendering one clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipRequest {
    pub clip_id: String,
    pub prompt_id: String,
    /// The prompt's edited text.
    pub prompt: String,
    /// Position of the clip in its batch.
    pub index: usize,
    pub credential: String,
}

/// Output of a successful clip render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedClip {
    pub url: String,
    /// Seconds.
    pub duration: f64,
    pub thumbnail: Option<String>,
}

/// External capability producing each stage's artifacts.
///
/// Implementations may take arbitrary time and complete in any order; the
/// adapter never assumes ordering between calls.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Pulls candidate ideas from a trend source. Takes no input.
    async fn source_ideas(&self) -> Result<Vec<IdeaDraft>, GeneratorError>;

    /// Drafts a script covering the given idea titles.
    async fn draft_script(&self, model: &str, idea_titles: &[String])
        -> Result<String, GeneratorError>;

    /// Produces a visual prompt for one script line.
    async fn synthesize_prompt(&self, line: &ScriptLine) -> Result<String, GeneratorError>;

    /// Renders one clip from an edited prompt.
    async fn render_clip(&self, request: &ClipRequest) -> Result<RenderedClip, GeneratorError>;
}
