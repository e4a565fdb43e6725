//! Read-only projections of the artifact store for external tools.
//!
//! Nothing here mutates pipeline state.

use csv::Writer;
use serde::{Deserialize, Serialize};

use crate::error::StudioResult;
use crate::pipeline::model::ClipStatus;
use crate::pipeline::store::ArtifactStore;

/// Default file name for the prompt table.
pub const PROMPTS_FILE_NAME: &str = "broll-prompts.csv";

/// Default file name for the clip timeline.
pub const TIMELINE_FILE_NAME: &str = "video-timeline.json";

/// Renders the prompts as CSV, one row per prompt in collection order.
pub fn prompts_csv(store: &ArtifactStore) -> StudioResult<String> {
    let mut wtr = Writer::from_writer(vec![]);

    wtr.write_record(["Line Number", "Script Line", "Generated Prompt", "Edited Prompt"])?;

    for prompt in store.prompts() {
        wtr.write_record([
            prompt.line_number.to_string().as_str(),
            prompt.script_line.as_str(),
            prompt.generated_prompt(),
            prompt.edited_prompt.as_str(),
        ])?;
    }

    let data = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// One clip on the exported timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub script_line: String,
    pub video_url: String,
    pub duration: f64,
    pub status: ClipStatus,
}

/// Clips as timeline entries, in collection order.
pub fn timeline(store: &ArtifactStore) -> Vec<TimelineEntry> {
    store
        .clips()
        .into_iter()
        .map(|clip| TimelineEntry {
            script_line: clip.script_line.clone(),
            video_url: clip.url.clone(),
            duration: clip.duration,
            status: clip.status,
        })
        .collect()
}

/// The timeline as pretty-printed JSON.
pub fn timeline_json(store: &ArtifactStore) -> StudioResult<String> {
    Ok(serde_json::to_string_pretty(&timeline(store))?)
}

/// Clip counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ClipSummary {
    pub ready: usize,
    pub generating: usize,
    pub failed: usize,
    /// Seconds, over ready clips only.
    pub total_duration: f64,
}

pub fn clip_summary(store: &ArtifactStore) -> ClipSummary {
    store
        .clips()
        .into_iter()
        .fold(ClipSummary::default(), |mut summary, clip| {
            match clip.status {
                ClipStatus::Ready => {
                    summary.ready += 1;
                    summary.total_duration += clip.duration;
                }
                ClipStatus::Generating => summary.generating += 1,
                ClipStatus::Error => summary.failed += 1,
            }
            summary
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::model::{BRollPrompt, ScriptLine, VideoClip};

    fn store() -> ArtifactStore {
        let mut store = ArtifactStore::new();
        let p1 = BRollPrompt::new("p1", &ScriptLine::new(1, "Hello, world"), "Wide shot");
        let p2 = BRollPrompt::new("p2", &ScriptLine::new(2, "Say \"hi\""), "Close up");
        store.replace_prompts(vec![p1.clone(), p2.clone()]);
        store.edit_prompt("p2", "Extreme close up").unwrap();
        store.replace_clips(vec![
            VideoClip::pending("c1", &p1).with_render("https://example.com/c1.mp4", 6.0),
            VideoClip::pending("c2", &p2).with_error("boom"),
            VideoClip::pending("c3", &p2),
            VideoClip::pending("c4", &p1).with_render("https://example.com/c4.mp4", 2.5),
        ]);
        store
    }

    #[test]
    fn test_prompts_csv() {
        let csv = prompts_csv(&store()).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "Line Number,Script Line,Generated Prompt,Edited Prompt");
        assert_eq!(lines[1], "1,\"Hello, world\",Wide shot,Wide shot");
        assert_eq!(lines[2], "2,\"Say \"\"hi\"\"\",Close up,Extreme close up");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_timeline_json() {
        let json = timeline_json(&store()).unwrap();
        let parsed: Vec<TimelineEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed[0].video_url, "https://example.com/c1.mp4");
        assert_eq!(parsed[1].status, ClipStatus::Error);
        assert!(json.contains("\"scriptLine\""));
        assert!(json.contains("\"videoUrl\""));
    }

    #[test]
    fn test_clip_summary() {
        let summary = clip_summary(&store());
        assert_eq!(summary.ready, 2);
        assert_eq!(summary.generating, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_duration, 8.5);
    }

    #[test]
    fn test_exports_do_not_mutate() {
        let store = store();
        let before = store.clone();
        prompts_csv(&store).unwrap();
        timeline_json(&store).unwrap();
        assert_eq!(store, before);
    }
}
