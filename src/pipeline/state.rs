//! Session state: stage position, completion record, artifacts and settings.

use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

use super::stage::{self, Stage, StageStatus};
use super::store::ArtifactStore;
use crate::config::Settings;

/// Everything one session knows.
///
/// Only `PipelineController` mutates a live state; readers get `&PipelineState`
/// or an owned clone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineState {
    session_id: String,
    current_stage: Stage,
    /// Furthest stage ever made current.
    furthest_visited: Stage,
    completed_stages: BTreeSet<Stage>,
    artifacts: ArtifactStore,
    settings: Settings,
}

impl PipelineState {
    /// Fresh session at the initial stage with nothing completed.
    pub fn new(settings: Settings) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            current_stage: Stage::INITIAL,
            furthest_visited: Stage::INITIAL,
            completed_stages: BTreeSet::new(),
            artifacts: ArtifactStore::new(),
            settings,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn current_stage(&self) -> Stage {
        self.current_stage
    }

    pub fn furthest_visited(&self) -> Stage {
        self.furthest_visited
    }

    /// Whether `stage` has been current at some point in the session.
    pub fn is_visited(&self, stage: Stage) -> bool {
        stage <= self.furthest_visited
    }

    pub fn completed_stages(&self) -> &BTreeSet<Stage> {
        &self.completed_stages
    }

    pub fn is_completed(&self, stage: Stage) -> bool {
        self.completed_stages.contains(&stage)
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Gate decision for `target` from the current position.
    pub fn can_enter(&self, target: Stage) -> bool {
        stage::can_enter(target, self.current_stage, &self.completed_stages)
    }

    pub fn reachable_stages(&self) -> Vec<Stage> {
        stage::reachable_stages(self.current_stage, &self.completed_stages)
    }

    pub fn stage_statuses(&self) -> Vec<(Stage, StageStatus)> {
        stage::stage_statuses(self.current_stage, &self.completed_stages)
    }

    pub(crate) fn set_current_stage(&mut self, stage: Stage) {
        self.current_stage = stage;
        self.furthest_visited = self.furthest_visited.max(stage);
    }

    /// Returns true when the stage was newly inserted.
    pub(crate) fn insert_completed(&mut self, stage: Stage) -> bool {
        self.completed_stages.insert(stage)
    }

    pub(crate) fn artifacts_mut(&mut self) -> &mut ArtifactStore {
        &mut self.artifacts
    }

    pub(crate) fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
