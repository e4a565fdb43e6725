//! Stage ordering and the admission gate.
//!
//! The gate is a set of pure functions over `(target, current, completed)`.
//! Two independent admission paths exist:
//! - **adjacency**: any stage at or before the one after `current`
//! - **completion**: any stage whose predecessor is already completed
//!
//! Either path admits the request. Skipping two or more stages ahead without
//! completion evidence is never admitted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// STAGE
// =============================================================================

/// One phase of the fixed production pipeline.
///
/// Declaration order is the pipeline order; `Ord` is derived from it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Idea,
    Script,
    #[serde(rename = "broll")]
    BRoll,
    Video,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Stage; 4] = [Stage::Idea, Stage::Script, Stage::BRoll, Stage::Video];

    /// The first stage of every session.
    pub const INITIAL: Stage = Stage::Idea;

    /// The stage with no successor.
    pub const TERMINAL: Stage = Stage::Video;

    /// Zero-based position in the pipeline order.
    pub fn index(self) -> usize {
        match self {
            Stage::Idea => 0,
            Stage::Script => 1,
            Stage::BRoll => 2,
            Stage::Video => 3,
        }
    }

    /// Looks a stage up by its position.
    pub fn from_index(index: usize) -> Option<Stage> {
        Self::ALL.get(index).copied()
    }

    /// The following stage, or `None` at the terminal stage.
    pub fn next(self) -> Option<Stage> {
        Self::from_index(self.index() + 1)
    }

    /// The preceding stage, or `None` at the first stage.
    pub fn prev(self) -> Option<Stage> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Human-readable stage name.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Idea => "Idea Generation",
            Stage::Script => "Script Creation",
            Stage::BRoll => "B-roll Prompting",
            Stage::Video => "Video Generation",
        }
    }

    /// One-line summary of what the stage produces.
    pub fn description(self) -> &'static str {
        match self {
            Stage::Idea => "Scrape trending news",
            Stage::Script => "AI-powered writing",
            Stage::BRoll => "Generate prompts",
            Stage::Video => "Create video clips",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// GATE
// =============================================================================

/// Decides whether `target` may become the current stage.
///
/// True iff `target` is at most one step past `current`, or the stage
/// immediately before `target` is in `completed`. The first stage is always
/// enterable, and so is `current` itself.
pub fn can_enter(target: Stage, current: Stage, completed: &BTreeSet<Stage>) -> bool {
    if target.index() <= current.index() + 1 {
        return true;
    }
    match target.prev() {
        Some(prev) => completed.contains(&prev),
        None => true,
    }
}

/// All stages the gate admits from the given position, in pipeline order.
pub fn reachable_stages(current: Stage, completed: &BTreeSet<Stage>) -> Vec<Stage> {
    Stage::ALL
        .into_iter()
        .filter(|&stage| can_enter(stage, current, completed))
        .collect()
}

/// Presentation status of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    /// The active stage.
    Current,
    /// Completed and not active.
    Completed,
    /// Admitted by the gate but not yet completed.
    Accessible,
    /// Rejected by the gate.
    Locked,
}

/// Status of every stage, in pipeline order.
pub fn stage_statuses(current: Stage, completed: &BTreeSet<Stage>) -> Vec<(Stage, StageStatus)> {
    Stage::ALL
        .into_iter()
        .map(|stage| {
            let status = if stage == current {
                StageStatus::Current
            } else if completed.contains(&stage) {
                StageStatus::Completed
            } else if can_enter(stage, current, completed) {
                StageStatus::Accessible
            } else {
                StageStatus::Locked
            };
            (stage, status)
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Every subset of the four stages.
    fn all_completed_sets() -> Vec<BTreeSet<Stage>> {
        (0u8..16)
            .map(|mask| {
                Stage::ALL
                    .into_iter()
                    .filter(|s| mask & (1 << s.index()) != 0)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::INITIAL.next(), Some(Stage::Script));
        assert_eq!(Stage::Script.next(), Some(Stage::BRoll));
        assert_eq!(Stage::BRoll.next(), Some(Stage::Video));
        assert_eq!(Stage::TERMINAL.next(), None);
        assert_eq!(Stage::Idea.prev(), None);
        assert_eq!(Stage::Video.prev(), Some(Stage::BRoll));
        assert!(Stage::Idea < Stage::Video);
        for stage in Stage::ALL {
            assert_eq!(Stage::from_index(stage.index()), Some(stage));
        }
    }

    #[test]
    fn test_gate_matrix_exhaustive() {
        for completed in all_completed_sets() {
            for current in Stage::ALL {
                for target in Stage::ALL {
                    let adjacent = target.index() <= current.index() + 1;
                    let evidence = match target.prev() {
                        Some(p) => completed.contains(&p),
                        None => true,
                    };
                    assert_eq!(
                        can_enter(target, current, &completed),
                        adjacent || evidence,
                        "target={target:?} current={current:?} completed={completed:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_current_and_first_always_enterable() {
        for completed in all_completed_sets() {
            for current in Stage::ALL {
                assert!(can_enter(current, current, &completed));
                assert!(can_enter(Stage::Idea, current, &completed));
            }
        }
    }

    #[test]
    fn test_cannot_skip_without_evidence() {
        let none = BTreeSet::new();
        assert!(can_enter(Stage::Script, Stage::Idea, &none));
        assert!(!can_enter(Stage::BRoll, Stage::Idea, &none));
        assert!(!can_enter(Stage::Video, Stage::Idea, &none));

        // Completing Script is evidence for BRoll even from Idea.
        let completed: BTreeSet<_> = [Stage::Script].into_iter().collect();
        assert!(can_enter(Stage::BRoll, Stage::Idea, &completed));
        assert!(!can_enter(Stage::Video, Stage::Idea, &completed));
    }

    #[test]
    fn test_reachable_and_statuses() {
        let completed: BTreeSet<_> = [Stage::Idea].into_iter().collect();
        assert_eq!(
            reachable_stages(Stage::Script, &completed),
            vec![Stage::Idea, Stage::Script, Stage::BRoll]
        );
        assert_eq!(
            reachable_stages(Stage::Idea, &BTreeSet::new()),
            vec![Stage::Idea, Stage::Script]
        );

        let statuses = stage_statuses(Stage::Idea, &BTreeSet::new());
        assert_eq!(
            statuses,
            vec![
                (Stage::Idea, StageStatus::Current),
                (Stage::Script, StageStatus::Accessible),
                (Stage::BRoll, StageStatus::Locked),
                (Stage::Video, StageStatus::Locked),
            ]
        );
    }

    #[test]
    fn test_stage_serde_names() {
        assert_eq!(serde_json::to_string(&Stage::BRoll).unwrap(), "\"broll\"");
        assert_eq!(serde_json::to_string(&Stage::Idea).unwrap(), "\"idea\"");
    }
}
