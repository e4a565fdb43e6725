//! The pipeline controller: the only mutation surface of a session.
//!
//! Stage transitions go through the gate; generation actions check their
//! stage's required input, dispatch units through the `GeneratorAdapter`, and
//! fold each unit's completion back into the artifact store as it arrives.
//!
//! Batch stages (ideas, script, prompts) run as a single unit and replace
//! their whole collection on success. Video runs one unit per clip; each clip
//! moves `Generating -> Ready | Error` on its own.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::model::*;
use super::script::{script_lines, ScriptStats};
use super::stage::Stage;
use super::state::PipelineState;
use super::store::ArtifactStore;
use crate::config::Settings;
use crate::error::{Blocked, StudioError, StudioResult};
use crate::generator::{
    ClipRequest, ContentGenerator, GeneratorAdapter, GeneratorError, UnitCompletion, UnitOutput,
    UnitRequest,
};

const IDEAS_UNIT: &str = "ideas";
const SCRIPT_UNIT: &str = "script";
const PROMPTS_UNIT: &str = "prompts";

/// Outcome of a stage change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The current stage changed to the given stage.
    Moved(Stage),
    /// Target was already current, or there was nowhere to go.
    Unchanged,
    /// The gate refused; nothing changed.
    Rejected,
}

/// What one applied completion did.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitReport {
    pub unit_id: String,
    pub stage: Stage,
    /// `None` on success.
    pub error: Option<GeneratorError>,
}

impl UnitReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Single authoritative owner of a session's `PipelineState`.
pub struct PipelineController {
    state: PipelineState,
    adapter: GeneratorAdapter,
    completions: mpsc::UnboundedReceiver<UnitCompletion>,
    /// Clip id -> snapshot taken before a regeneration (`None` for first renders).
    pending_clips: HashMap<String, Option<VideoClip>>,
}

impl PipelineController {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    pub fn new(generator: Arc<dyn ContentGenerator>, settings: Settings) -> Self {
        let (adapter, completions) = GeneratorAdapter::new(generator);
        let state = PipelineState::new(settings);
        info!(session = %state.session_id(), "pipeline session started");
        Self {
            state,
            adapter,
            completions,
            pending_clips: HashMap::new(),
        }
    }

    /// Read-only view of the live state.
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> PipelineState {
        self.state.clone()
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        self.state.artifacts()
    }

    fn store(&mut self) -> &mut ArtifactStore {
        self.state.artifacts_mut()
    }

    // =========================================================================
    // STAGE TRANSITIONS
    // =========================================================================

    /// Moves to `target` if the gate admits it; otherwise does nothing.
    pub fn request_stage_change(&mut self, target: Stage) -> Transition {
        let current = self.state.current_stage();
        if target == current {
            return Transition::Unchanged;
        }
        if !self.state.can_enter(target) {
            debug!(?current, ?target, "stage change rejected by gate");
            return Transition::Rejected;
        }
        self.state.set_current_stage(target);
        info!(from = ?current, to = ?target, "stage changed");
        Transition::Moved(target)
    }

    /// Records `stage` as completed. Repeating it is a no-op.
    ///
    /// A stage that was never current is silently ignored.
    pub fn mark_stage_complete(&mut self, stage: Stage) {
        if !self.state.is_visited(stage) {
            debug!(?stage, "completion of unvisited stage ignored");
            return;
        }
        if self.state.insert_completed(stage) {
            info!(?stage, "stage completed");
        }
    }

    /// Completes the current stage and moves to the next one.
    ///
    /// At the terminal stage nothing changes.
    pub fn advance(&mut self) -> Transition {
        let current = self.state.current_stage();
        let Some(next) = current.next() else {
            return Transition::Unchanged;
        };
        self.mark_stage_complete(current);
        self.state.set_current_stage(next);
        info!(from = ?current, to = ?next, "advanced");
        Transition::Moved(next)
    }

    /// Whether the primary action of `stage` has its required input.
    ///
    /// Independent of the gate: a stage may be enterable but not ready.
    pub fn check_ready(&self, stage: Stage) -> Result<(), Blocked> {
        let store = self.state.artifacts();
        match stage {
            Stage::Idea => Ok(()),
            Stage::Script if store.approved_count() == 0 => Err(Blocked::NoApprovedIdeas),
            Stage::Script => Ok(()),
            Stage::BRoll if store.script_draft().is_empty() => Err(Blocked::EmptyScript),
            Stage::BRoll if script_lines(store.script_draft()).is_empty() => {
                Err(Blocked::NoScriptLines)
            }
            Stage::BRoll => Ok(()),
            Stage::Video if store.prompt_count() == 0 => Err(Blocked::NoPrompts),
            Stage::Video if !self.state.settings().has_credential() => {
                Err(Blocked::MissingCredential)
            }
            Stage::Video => Ok(()),
        }
    }

    // =========================================================================
    // DIRECT EDITS
    // =========================================================================

    pub fn set_approval(&mut self, idea_id: &str, approval: Approval) -> StudioResult<()> {
        self.store().set_approval(idea_id, approval)?;
        debug!(idea = idea_id, ?approval, "idea reviewed");
        Ok(())
    }

    pub fn approve_idea(&mut self, idea_id: &str) -> StudioResult<()> {
        self.set_approval(idea_id, Approval::Approved)
    }

    pub fn reject_idea(&mut self, idea_id: &str) -> StudioResult<()> {
        self.set_approval(idea_id, Approval::Rejected)
    }

    pub fn set_script_draft(&mut self, text: impl Into<String>) {
        self.store().set_script_draft(text);
    }

    pub fn script_stats(&self) -> ScriptStats {
        ScriptStats::of(self.artifacts().script_draft())
    }

    /// Freezes the current draft as a new version.
    pub fn save_script_version(&mut self, author: &str) -> StudioResult<ScriptVersion> {
        if self.artifacts().script_draft().is_empty() {
            return Err(StudioError::blocked(Blocked::EmptyScript));
        }
        let id = self.store().next_id("version");
        let version = ScriptVersion::new(id, self.artifacts().script_draft(), author, now_millis());
        self.store().append_script_version(version.clone());
        info!(version = %version.id, author, "script version saved");
        Ok(version)
    }

    /// Replaces the draft with the content of a saved version.
    pub fn load_script_version(&mut self, version_id: &str) -> StudioResult<()> {
        let content = self
            .artifacts()
            .script_version(version_id)
            .map(|v| v.content.clone())
            .ok_or_else(|| StudioError::not_found("script version", version_id))?;
        self.store().set_script_draft(content);
        Ok(())
    }

    pub fn edit_prompt(&mut self, prompt_id: &str, text: impl Into<String>) -> StudioResult<()> {
        self.store().edit_prompt(prompt_id, text)
    }

    pub fn bulk_edit_prompts(&mut self, prompt_ids: &[String], text: &str) -> StudioResult<()> {
        self.store().bulk_edit_prompts(prompt_ids, text)
    }

    pub fn reset_prompt(&mut self, prompt_id: &str) -> StudioResult<()> {
        self.store().reset_prompt(prompt_id)
    }

    pub fn update_settings(&mut self, settings: Settings) {
        debug!(?settings, "settings updated");
        self.state.set_settings(settings);
    }

    // =========================================================================
    // GENERATION ACTIONS
    // =========================================================================

    /// Sources a fresh set of ideas, replacing the current ones on completion.
    pub fn generate_ideas(&mut self) -> StudioResult<()> {
        self.dispatch_batch(IDEAS_UNIT, UnitRequest::Ideas)
    }

    /// Drafts a script from the approved ideas.
    pub fn generate_script(&mut self) -> StudioResult<()> {
        self.check_ready(Stage::Script)?;
        let idea_titles = self
            .artifacts()
            .approved_ideas()
            .into_iter()
            .map(|idea| idea.title.clone())
            .collect();
        let model = self.state.settings().ai_model.clone();
        self.dispatch_batch(SCRIPT_UNIT, UnitRequest::Script { model, idea_titles })
    }

    /// Synthesizes one prompt per content line of the draft.
    pub fn generate_prompts(&mut self) -> StudioResult<()> {
        self.check_ready(Stage::BRoll)?;
        let lines = script_lines(self.artifacts().script_draft());
        self.dispatch_batch(PROMPTS_UNIT, UnitRequest::Prompts { lines })
    }

    /// Starts one clip render per prompt. Returns the new clip ids.
    ///
    /// Existing clips are replaced by the new `Generating` set immediately.
    pub fn generate_all_clips(&mut self) -> StudioResult<Vec<String>> {
        self.check_ready(Stage::Video)?;
        if self.adapter.in_flight_for(Stage::Video) > 0 {
            return Err(StudioError::Busy(Stage::Video));
        }

        let prompts: Vec<BRollPrompt> = self.artifacts().prompts().into_iter().cloned().collect();
        let clips: Vec<VideoClip> = prompts
            .iter()
            .map(|prompt| {
                let id = self.store().next_id("clip");
                VideoClip::pending(id, prompt)
            })
            .collect();
        self.store().replace_clips(clips.clone());

        let credential = self.state.settings().credential.clone();
        let mut ids = Vec::with_capacity(clips.len());
        for (index, (clip, prompt)) in clips.into_iter().zip(&prompts).enumerate() {
            let request = ClipRequest {
                clip_id: clip.id.clone(),
                prompt_id: prompt.id.clone(),
                prompt: clip.prompt.clone(),
                index,
                credential: credential.clone(),
            };
            self.adapter.dispatch(clip.id.clone(), UnitRequest::Clip(request));
            self.pending_clips.insert(clip.id.clone(), None);
            ids.push(clip.id);
        }
        info!(clips = ids.len(), "clip rendering dispatched");
        Ok(ids)
    }

    /// Re-renders one clip. Other clips keep their identity and status.
    pub fn regenerate_clip(&mut self, clip_id: &str) -> StudioResult<()> {
        if !self.state.settings().has_credential() {
            return Err(StudioError::blocked(Blocked::MissingCredential));
        }
        let previous = self
            .artifacts()
            .clip(clip_id)
            .cloned()
            .ok_or_else(|| StudioError::not_found("clip", clip_id))?;
        if self.adapter.is_in_flight(clip_id) {
            return Err(StudioError::Busy(Stage::Video));
        }
        // Prompts may have been regenerated since; the clip keeps its last prompt text.
        let prompt = self
            .artifacts()
            .prompt(&previous.prompt_id)
            .map(|p| p.edited_prompt.clone())
            .unwrap_or_else(|| previous.prompt.clone());
        let index = self
            .artifacts()
            .clips()
            .iter()
            .position(|c| c.id == clip_id)
            .unwrap_or_default();

        self.store().restart_clip(clip_id, prompt.as_str())?;

        let request = ClipRequest {
            clip_id: clip_id.to_string(),
            prompt_id: previous.prompt_id.clone(),
            prompt,
            index,
            credential: self.state.settings().credential.clone(),
        };
        self.adapter.dispatch(clip_id, UnitRequest::Clip(request));
        self.pending_clips.insert(clip_id.to_string(), Some(previous));
        info!(clip = clip_id, "clip regeneration dispatched");
        Ok(())
    }

    /// Abandons one in-flight unit. Returns false when it was not in flight.
    ///
    /// A cancelled regeneration restores the clip as it was before; a
    /// cancelled first render leaves the clip in `Error`.
    pub fn cancel_unit(&mut self, unit_id: &str) -> bool {
        if !self.adapter.cancel(unit_id) {
            return false;
        }
        match self.pending_clips.remove(unit_id) {
            Some(Some(previous)) => self.store().upsert_clip(previous),
            Some(None) => {
                let reason = GeneratorError::Cancelled.to_string();
                if let Err(error) = self.store().fail_clip(unit_id, reason) {
                    debug!(clip = unit_id, %error, "cancelled clip no longer in store");
                }
            }
            None => {}
        }
        info!(unit = unit_id, "unit cancelled");
        true
    }

    /// Whether any unit is still in flight.
    pub fn is_busy(&self) -> bool {
        !self.adapter.is_idle()
    }

    /// Whether a given unit (clip id or batch unit) is in flight.
    pub fn is_unit_in_flight(&self, unit_id: &str) -> bool {
        self.adapter.is_in_flight(unit_id)
    }

    /// Number of units in flight for a stage.
    pub fn in_flight_for(&self, stage: Stage) -> usize {
        self.adapter.in_flight_for(stage)
    }

    fn dispatch_batch(&mut self, unit_id: &str, request: UnitRequest) -> StudioResult<()> {
        let stage = request.stage();
        if self.adapter.is_in_flight(unit_id) {
            return Err(StudioError::Busy(stage));
        }
        self.adapter.dispatch(unit_id, request);
        info!(?stage, "generation dispatched");
        Ok(())
    }

    // =========================================================================
    // COMPLETION HANDLING
    // =========================================================================

    /// Folds one completion into the store.
    ///
    /// Returns `None` for stale completions (cancelled or superseded units).
    pub fn apply_completion(&mut self, completion: UnitCompletion) -> Option<UnitReport> {
        if !self.adapter.settle(&completion) {
            debug!(unit = %completion.unit_id, ticket = completion.ticket, "discarding stale completion");
            return None;
        }
        let UnitCompletion {
            unit_id,
            stage,
            outcome,
            ..
        } = completion;

        let error = match outcome {
            Ok(output) => {
                self.apply_output(&unit_id, output);
                None
            }
            Err(error) => {
                warn!(unit = %unit_id, ?stage, %error, "generation unit failed");
                self.apply_failure(&unit_id, &error);
                Some(error)
            }
        };
        Some(UnitReport {
            unit_id,
            stage,
            error,
        })
    }

    fn apply_output(&mut self, unit_id: &str, output: UnitOutput) {
        match output {
            UnitOutput::Ideas(drafts) => {
                let created_at = now_millis();
                let ideas: Vec<Idea> = drafts
                    .into_iter()
                    .map(|draft| {
                        let id = self.store().next_id("idea");
                        Idea::from_draft(id, draft, created_at)
                    })
                    .collect();
                info!(count = ideas.len(), "ideas sourced");
                self.store().replace_ideas(ideas);
            }
            UnitOutput::Script(text) => {
                info!(chars = text.len(), "script drafted");
                self.store().set_script_draft(text);
            }
            UnitOutput::Prompts(pairs) => {
                let prompts: Vec<BRollPrompt> = pairs
                    .into_iter()
                    .map(|(line, generated)| {
                        let id = self.store().next_id("prompt");
                        BRollPrompt::new(id, &line, generated)
                    })
                    .collect();
                info!(count = prompts.len(), "prompts generated");
                self.store().replace_prompts(prompts);
            }
            UnitOutput::Clip(rendered) => {
                self.pending_clips.remove(unit_id);
                let duration = rendered.duration;
                match self
                    .store()
                    .finish_clip(unit_id, rendered.url, duration, rendered.thumbnail)
                {
                    Ok(()) => info!(clip = unit_id, duration, "clip ready"),
                    Err(error) => debug!(clip = unit_id, %error, "rendered clip no longer in store"),
                }
            }
        }
    }

    fn apply_failure(&mut self, unit_id: &str, error: &GeneratorError) {
        if self.pending_clips.remove(unit_id).is_none() {
            return;
        }
        if let Err(missing) = self.store().fail_clip(unit_id, error.to_string()) {
            debug!(clip = unit_id, error = %missing, "failed clip no longer in store");
        }
    }

    /// Waits for the next completion from any unit.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<UnitCompletion> {
        if self.adapter.is_idle() {
            return None;
        }
        self.completions.recv().await
    }

    /// Waits for and applies the next live completion.
    pub async fn process_next(&mut self) -> Option<UnitReport> {
        loop {
            let completion = self.next_completion().await?;
            if let Some(report) = self.apply_completion(completion) {
                return Some(report);
            }
        }
    }

    /// Applies completions until no unit is in flight.
    pub async fn run_until_idle(&mut self) -> Vec<UnitReport> {
        let mut reports = Vec::new();
        while let Some(report) = self.process_next().await {
            reports.push(report);
        }
        reports
    }

    /// Applies every completion already delivered, without waiting.
    pub fn poll_completions(&mut self) -> Vec<UnitReport> {
        let mut reports = Vec::new();
        while let Ok(completion) = self.completions.try_recv() {
            if let Some(report) = self.apply_completion(completion) {
                reports.push(report);
            }
        }
        reports
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::mock::{MockDelays, MockGenerator};

    fn controller_with(generator: MockGenerator, settings: Settings) -> PipelineController {
        PipelineController::new(Arc::new(generator), settings)
    }

    fn controller() -> PipelineController {
        controller_with(
            MockGenerator::new().with_delays(MockDelays::instant()),
            Settings::new().with_credential("key"),
        )
    }

    #[test]
    fn test_request_stage_change_gated() {
        let mut c = controller();
        assert_eq!(c.request_stage_change(Stage::Idea), Transition::Unchanged);
        assert_eq!(c.request_stage_change(Stage::BRoll), Transition::Rejected);
        assert_eq!(c.state().current_stage(), Stage::Idea);

        // Speculative one-step jump without completing.
        assert_eq!(c.request_stage_change(Stage::Script), Transition::Moved(Stage::Script));
        assert!(c.state().completed_stages().is_empty());
        assert_eq!(c.request_stage_change(Stage::BRoll), Transition::Moved(Stage::BRoll));
        assert_eq!(c.request_stage_change(Stage::Idea), Transition::Moved(Stage::Idea));
        // Back at Idea with nothing completed: Video is locked again.
        assert_eq!(c.request_stage_change(Stage::Video), Transition::Rejected);
    }

    #[test]
    fn test_mark_stage_complete_idempotent() {
        let mut c = controller();
        c.mark_stage_complete(Stage::Idea);
        let once = c.state().completed_stages().clone();
        c.mark_stage_complete(Stage::Idea);
        assert_eq!(c.state().completed_stages(), &once);
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn test_unvisited_stage_cannot_be_completed() {
        let mut c = controller();
        c.mark_stage_complete(Stage::BRoll);
        assert!(c.state().completed_stages().is_empty());
        assert_eq!(c.request_stage_change(Stage::Video), Transition::Rejected);
        assert_eq!(c.state().current_stage(), Stage::Idea);

        // Once visited, a later stage may be completed from an earlier position.
        assert_eq!(c.request_stage_change(Stage::Script), Transition::Moved(Stage::Script));
        assert_eq!(c.request_stage_change(Stage::Idea), Transition::Moved(Stage::Idea));
        c.mark_stage_complete(Stage::Script);
        assert!(c.state().is_completed(Stage::Script));
        assert_eq!(c.request_stage_change(Stage::BRoll), Transition::Moved(Stage::BRoll));
    }

    #[test]
    fn test_advance_through_to_terminal() {
        let mut c = controller();
        assert_eq!(c.advance(), Transition::Moved(Stage::Script));
        assert_eq!(c.advance(), Transition::Moved(Stage::BRoll));
        assert_eq!(c.advance(), Transition::Moved(Stage::Video));

        let before = c.snapshot();
        assert_eq!(c.advance(), Transition::Unchanged);
        assert_eq!(c.snapshot(), before);
        assert!(!c.state().is_completed(Stage::Video));

        // Completed earlier stages remain revisitable, and forward again.
        assert_eq!(c.request_stage_change(Stage::Idea), Transition::Moved(Stage::Idea));
        assert_eq!(c.request_stage_change(Stage::Video), Transition::Moved(Stage::Video));
    }

    #[test]
    fn test_check_ready_requirements() {
        let mut c = controller_with(
            MockGenerator::new().with_delays(MockDelays::instant()),
            Settings::new(),
        );
        assert_eq!(c.check_ready(Stage::Idea), Ok(()));
        assert_eq!(c.check_ready(Stage::Script), Err(Blocked::NoApprovedIdeas));
        assert_eq!(c.check_ready(Stage::BRoll), Err(Blocked::EmptyScript));
        assert_eq!(c.check_ready(Stage::Video), Err(Blocked::NoPrompts));

        c.set_script_draft("[INTRO]\n\n");
        assert_eq!(c.check_ready(Stage::BRoll), Err(Blocked::NoScriptLines));
        c.set_script_draft("One line");
        assert_eq!(c.check_ready(Stage::BRoll), Ok(()));
    }

    #[test]
    fn test_save_and_load_script_version() {
        let mut c = controller();
        assert!(matches!(
            c.save_script_version("You"),
            Err(StudioError::Blocked(Blocked::EmptyScript))
        ));

        c.set_script_draft("first take");
        let v1 = c.save_script_version("You").unwrap();
        c.set_script_draft("second take");
        c.save_script_version("AI Assistant").unwrap();

        assert_eq!(c.artifacts().script_versions().len(), 2);
        assert_eq!(c.artifacts().latest_script_version().unwrap().author, "AI Assistant");

        c.load_script_version(&v1.id).unwrap();
        assert_eq!(c.artifacts().script_draft(), "first take");
        assert!(c.load_script_version("version-missing").is_err());
    }

    #[tokio::test]
    async fn test_approval_scenario() {
        let mut c = controller();
        c.generate_ideas().unwrap();
        c.run_until_idle().await;

        let ids: Vec<String> = c.artifacts().ideas().iter().take(3).map(|i| i.id.clone()).collect();
        assert_eq!(c.check_ready(Stage::Script), Err(Blocked::NoApprovedIdeas));
        assert!(c.generate_script().is_err());

        c.approve_idea(&ids[0]).unwrap();
        c.approve_idea(&ids[1]).unwrap();
        c.reject_idea(&ids[2]).unwrap();
        assert_eq!(c.artifacts().approved_count(), 2);
        assert_eq!(c.check_ready(Stage::Script), Ok(()));

        c.generate_script().unwrap();
        let reports = c.run_until_idle().await;
        assert_eq!(reports.len(), 1);
        assert!(reports[0].succeeded());
        assert!(!c.artifacts().script_draft().is_empty());
    }

    #[tokio::test]
    async fn test_prompts_from_three_line_script() {
        let mut c = controller();
        assert!(matches!(
            c.generate_prompts(),
            Err(StudioError::Blocked(Blocked::EmptyScript))
        ));

        c.set_script_draft("[INTRO]\nAI is here.\n\nClimate talks.\n[OUTRO]\nRockets fly.");
        c.generate_prompts().unwrap();
        assert!(matches!(c.generate_prompts(), Err(StudioError::Busy(Stage::BRoll))));
        c.run_until_idle().await;

        let prompts = c.artifacts().prompts();
        assert_eq!(prompts.len(), 3);
        let numbers: Vec<_> = prompts.iter().map(|p| p.line_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(prompts[2].script_line, "Rockets fly.");
    }

    #[tokio::test]
    async fn test_video_refused_without_credential() {
        let mut c = controller_with(
            MockGenerator::new().with_delays(MockDelays::instant()),
            Settings::new(),
        );
        c.set_script_draft("One\nTwo");
        c.generate_prompts().unwrap();
        c.run_until_idle().await;

        assert!(matches!(
            c.generate_all_clips(),
            Err(StudioError::Blocked(Blocked::MissingCredential))
        ));
        assert_eq!(c.artifacts().clip_count(), 0);
        assert!(!c.is_busy());

        c.update_settings(Settings::new().with_credential("key"));
        assert_eq!(c.generate_all_clips().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_completions_without_waiting() {
        let mut c = controller();
        assert!(c.poll_completions().is_empty());

        c.generate_ideas().unwrap();
        assert!(c.is_unit_in_flight(IDEAS_UNIT));
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let reports = c.poll_completions();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].stage, Stage::Idea);
        assert!(!c.is_busy());
        assert_eq!(c.artifacts().idea_count(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_first_render_marks_error() {
        let generator = MockGenerator::new().with_delays(MockDelays {
            clip: std::time::Duration::from_secs(5),
            ..MockDelays::instant()
        });
        let mut c = controller_with(generator, Settings::new().with_credential("key"));
        c.set_script_draft("One\nTwo");
        c.generate_prompts().unwrap();
        c.run_until_idle().await;

        let ids = c.generate_all_clips().unwrap();
        assert!(c.cancel_unit(&ids[0]));
        assert!(!c.cancel_unit(&ids[0]));
        assert_eq!(c.artifacts().clip(&ids[0]).unwrap().status, ClipStatus::Error);

        let reports = c.run_until_idle().await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].unit_id, ids[1]);
        assert!(c.artifacts().clip(&ids[1]).unwrap().is_ready());
        assert_eq!(c.artifacts().clip(&ids[0]).unwrap().status, ClipStatus::Error);
    }
}
