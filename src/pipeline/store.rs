//! Artifact store holding every stage's outputs for one session.
//!
//! Collections are id-keyed maps with a separate order list, so targeted
//! replacement is O(1) and the ordered view is derived on read. Every
//! mutation replaces a whole slice (a collection or a single entity); no
//! caller ever observes a half-applied edit.

use paste::paste;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::model::*;
use crate::error::{StudioError, StudioResult};

// =============================================================================
// COLLECTION MACRO
// =============================================================================

/// Generates replace/read accessors for an id-keyed collection.
/// All collections share the same map + order layout.
macro_rules! collection_ops {
    ($entity:ident, $single:ident, $collection:ident, $order:ident) => {
        paste! {
            /// Replaces the whole collection, preserving the given order.
            ///
            /// A repeated id keeps its first position and its last value.
            pub fn [<replace_ $collection>](&mut self, items: Vec<$entity>) {
                self.$order.clear();
                self.$collection.clear();
                for item in items {
                    if !self.$collection.contains_key(&item.id) {
                        self.$order.push(item.id.clone());
                    }
                    self.$collection.insert(item.id.clone(), item);
                }
            }

            /// Gets an entity by ID.
            pub fn $single(&self, id: &str) -> Option<&$entity> {
                self.$collection.get(id)
            }

            /// Ordered view of the collection.
            pub fn $collection(&self) -> Vec<&$entity> {
                self.$order
                    .iter()
                    .filter_map(|id| self.$collection.get(id))
                    .collect()
            }

            /// Number of entities in the collection.
            pub fn [<$single _count>](&self) -> usize {
                self.$order.len()
            }

            fn [<$single _mut>](&mut self, id: &str) -> StudioResult<&mut $entity> {
                self.$collection
                    .get_mut(id)
                    .ok_or_else(|| StudioError::not_found(stringify!($single), id))
            }
        }
    };
}

// =============================================================================
// ARTIFACT STORE
// =============================================================================

/// Per-session container for ideas, script, prompts and clips.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtifactStore {
    ideas: HashMap<String, Idea>,
    idea_order: Vec<String>,

    script_draft: String,
    script_versions: Vec<ScriptVersion>,

    prompts: HashMap<String, BRollPrompt>,
    prompt_order: Vec<String>,

    clips: HashMap<String, VideoClip>,
    clip_order: Vec<String>,

    /// Session-monotonic counter folded into every generated id.
    next_seq: u64,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh id of the form `<kind>-<millis>-<seq>`.
    pub fn next_id(&mut self, kind: &str) -> String {
        let seq = self.next_seq;
        self.next_seq += 1;
        format!("{}-{}-{}", kind, now_millis(), seq)
    }

    collection_ops!(Idea, idea, ideas, idea_order);
    collection_ops!(BRollPrompt, prompt, prompts, prompt_order);
    collection_ops!(VideoClip, clip, clips, clip_order);

    // =========================================================================
    // IDEAS
    // =========================================================================

    /// Sets the review decision for one idea.
    pub fn set_approval(&mut self, idea_id: &str, approval: Approval) -> StudioResult<()> {
        self.idea_mut(idea_id)?.approval = approval;
        Ok(())
    }

    /// Approved ideas in collection order.
    pub fn approved_ideas(&self) -> Vec<&Idea> {
        self.ideas().into_iter().filter(|i| i.is_approved()).collect()
    }

    pub fn approved_count(&self) -> usize {
        self.ideas.values().filter(|i| i.is_approved()).count()
    }

    /// Ideas with any decision, approved or rejected.
    pub fn reviewed_count(&self) -> usize {
        self.ideas.values().filter(|i| i.is_reviewed()).count()
    }

    // =========================================================================
    // SCRIPT
    // =========================================================================

    pub fn script_draft(&self) -> &str {
        &self.script_draft
    }

    pub fn set_script_draft(&mut self, text: impl Into<String>) {
        self.script_draft = text.into();
    }

    /// Appends a snapshot. Versions are never removed or reordered.
    pub fn append_script_version(&mut self, version: ScriptVersion) {
        self.script_versions.push(version);
    }

    /// All versions, oldest first.
    pub fn script_versions(&self) -> &[ScriptVersion] {
        &self.script_versions
    }

    pub fn latest_script_version(&self) -> Option<&ScriptVersion> {
        self.script_versions.last()
    }

    pub fn script_version(&self, id: &str) -> Option<&ScriptVersion> {
        self.script_versions.iter().find(|v| v.id == id)
    }

    // =========================================================================
    // PROMPTS
    // =========================================================================

    /// Replaces the edited text of one prompt. The generated text is untouched.
    pub fn edit_prompt(&mut self, prompt_id: &str, text: impl Into<String>) -> StudioResult<()> {
        self.prompt_mut(prompt_id)?.edited_prompt = text.into();
        Ok(())
    }

    /// Applies the same edited text to several prompts.
    ///
    /// Every id is checked before any prompt changes.
    pub fn bulk_edit_prompts(&mut self, prompt_ids: &[String], text: &str) -> StudioResult<()> {
        if let Some(missing) = prompt_ids.iter().find(|id| !self.prompts.contains_key(*id)) {
            return Err(StudioError::not_found("prompt", missing.as_str()));
        }
        for id in prompt_ids {
            self.prompt_mut(id)?.edited_prompt = text.to_string();
        }
        Ok(())
    }

    /// Restores the edited text to the generated text.
    pub fn reset_prompt(&mut self, prompt_id: &str) -> StudioResult<()> {
        let prompt = self.prompt_mut(prompt_id)?;
        prompt.edited_prompt = prompt.generated_prompt().to_string();
        Ok(())
    }

    // =========================================================================
    // CLIPS
    // =========================================================================

    /// Inserts or fully replaces a clip by id. Other clips are untouched.
    pub fn upsert_clip(&mut self, clip: VideoClip) {
        if !self.clips.contains_key(&clip.id) {
            self.clip_order.push(clip.id.clone());
        }
        self.clips.insert(clip.id.clone(), clip);
    }

    /// Puts a clip back into `Generating` for a render of `prompt`.
    pub fn restart_clip(&mut self, clip_id: &str, prompt: impl Into<String>) -> StudioResult<()> {
        let clip = self.clip_mut(clip_id)?;
        clip.prompt = prompt.into();
        clip.status = ClipStatus::Generating;
        clip.error = None;
        Ok(())
    }

    /// Marks a clip ready. A missing thumbnail keeps the previous one.
    pub fn finish_clip(
        &mut self,
        clip_id: &str,
        url: impl Into<String>,
        duration: f64,
        thumbnail: Option<String>,
    ) -> StudioResult<()> {
        let clip = self.clip_mut(clip_id)?;
        clip.url = url.into();
        clip.duration = duration;
        clip.status = ClipStatus::Ready;
        clip.error = None;
        if thumbnail.is_some() {
            clip.thumbnail = thumbnail;
        }
        Ok(())
    }

    /// Marks a clip failed.
    pub fn fail_clip(&mut self, clip_id: &str, reason: impl Into<String>) -> StudioResult<()> {
        let clip = self.clip_mut(clip_id)?;
        clip.status = ClipStatus::Error;
        clip.error = Some(reason.into());
        Ok(())
    }

    /// Clips rendered from the given prompt, in collection order.
    pub fn clips_for_prompt(&self, prompt_id: &str) -> Vec<&VideoClip> {
        self.clips()
            .into_iter()
            .filter(|c| c.prompt_id == prompt_id)
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
