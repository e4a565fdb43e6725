//! Artifact types produced by each pipeline stage.
//!
//! Ideas, script versions, b-roll prompts and video clips. All timestamps are
//! milliseconds since the Unix epoch.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

// =============================================================================
// IDEA
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interest {
    High,
    Medium,
    Low,
}

/// Review decision on an idea.
///
/// There is no terminal state: an idea may move between any two values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Approval {
    #[default]
    Unset,
    Approved,
    Rejected,
}

/// Idea content as returned by a generator, before the store assigns identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaDraft {
    pub title: String,
    pub description: String,
    /// Name of the publication the idea was sourced from.
    pub source: String,
    pub source_url: String,
    pub sentiment: Sentiment,
    pub interest: Interest,
}

impl IdeaDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            source: String::new(),
            source_url: String::new(),
            sentiment: Sentiment::Neutral,
            interest: Interest::Medium,
        }
    }

    /// Builder: Set provenance.
    pub fn with_source(mut self, source: impl Into<String>, url: impl Into<String>) -> Self {
        self.source = source.into();
        self.source_url = url.into();
        self
    }

    /// Builder: Set sentiment.
    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = sentiment;
        self
    }

    /// Builder: Set interest.
    pub fn with_interest(mut self, interest: Interest) -> Self {
        self.interest = interest;
        self
    }
}

/// A candidate topic. Only `approval` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: String,
    pub title: String,
    pub description: String,
    pub source: String,
    pub source_url: String,
    pub sentiment: Sentiment,
    pub interest: Interest,
    pub approval: Approval,
    pub created_at: i64,
}

impl Idea {
    /// Gives a draft its identity. Approval starts `Unset`.
    pub fn from_draft(id: impl Into<String>, draft: IdeaDraft, created_at: i64) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            description: draft.description,
            source: draft.source,
            source_url: draft.source_url,
            sentiment: draft.sentiment,
            interest: draft.interest,
            approval: Approval::Unset,
            created_at,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.approval == Approval::Approved
    }

    pub fn is_reviewed(&self) -> bool {
        self.approval != Approval::Unset
    }
}

// =============================================================================
// SCRIPT
// =============================================================================

/// Frozen copy of the script draft at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptVersion {
    pub id: String,
    pub content: String,
    pub created_at: i64,
    pub author: String,
}

impl ScriptVersion {
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            created_at,
            author: author.into(),
        }
    }
}

/// A content line of the script, numbered over content lines only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    /// 1-based, contiguous over the filtered lines.
    pub number: usize,
    /// Trimmed line text.
    pub text: String,
}

impl ScriptLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

// =============================================================================
// B-ROLL PROMPT
// =============================================================================

/// Visual prompt for one script line.
///
/// `generated_prompt` is fixed once produced; edits only touch `edited_prompt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BRollPrompt {
    pub id: String,
    pub script_line: String,
    pub line_number: usize,
    generated_prompt: String,
    pub edited_prompt: String,
}

impl BRollPrompt {
    /// Creates a prompt whose edited text starts equal to the generated text.
    pub fn new(id: impl Into<String>, line: &ScriptLine, generated: impl Into<String>) -> Self {
        let generated = generated.into();
        Self {
            id: id.into(),
            script_line: line.text.clone(),
            line_number: line.number,
            edited_prompt: generated.clone(),
            generated_prompt: generated,
        }
    }

    pub fn generated_prompt(&self) -> &str {
        &self.generated_prompt
    }

    /// True when the edited text differs from the generated text.
    pub fn is_edited(&self) -> bool {
        self.edited_prompt != self.generated_prompt
    }
}

// =============================================================================
// VIDEO CLIP
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipStatus {
    #[default]
    Generating,
    Ready,
    Error,
}

/// Rendered (or rendering) clip for a b-roll prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoClip {
    pub id: String,
    pub prompt_id: String,
    /// Copy of the originating prompt's script line.
    pub script_line: String,
    /// Prompt text of the latest render request.
    pub prompt: String,
    pub url: String,
    /// Seconds.
    pub duration: f64,
    pub status: ClipStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Failure reason when `status` is `Error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VideoClip {
    /// Creates a clip in `Generating` state for the given prompt.
    pub fn pending(id: impl Into<String>, prompt: &BRollPrompt) -> Self {
        Self {
            id: id.into(),
            prompt_id: prompt.id.clone(),
            script_line: prompt.script_line.clone(),
            prompt: prompt.edited_prompt.clone(),
            url: String::new(),
            duration: 0.0,
            status: ClipStatus::Generating,
            thumbnail: None,
            error: None,
        }
    }

    /// Builder: Mark ready with render output.
    pub fn with_render(mut self, url: impl Into<String>, duration: f64) -> Self {
        self.url = url.into();
        self.duration = duration;
        self.status = ClipStatus::Ready;
        self.error = None;
        self
    }

    /// Builder: Set thumbnail.
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Builder: Mark failed.
    pub fn with_error(mut self, reason: impl Into<String>) -> Self {
        self.status = ClipStatus::Error;
        self.error = Some(reason.into());
        self
    }

    pub fn is_ready(&self) -> bool {
        self.status == ClipStatus::Ready
    }
}

// =============================================================================
// TESTS
// =============================================================================
